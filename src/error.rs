//! 统一错误处理模块
//!
//! 提供html-xliff项目的统一错误类型定义和处理机制

// 标准库导入
use std::fmt;

// 第三方crate导入
use anyhow::Error as AnyhowError;

/// html-xliff 统一错误类型
///
/// 内部不变量被破坏（例如消歧之后仍出现重复id）属于转换器缺陷，
/// 直接断言失败，不会出现在这里。
#[derive(Debug)]
pub enum XliffError {
    /// HTML解析相关错误
    HtmlParse {
        /// 具体错误信息
        details: String,
    },

    /// XLIFF/XML解析相关错误
    XliffParse {
        /// 具体错误信息
        details: String,
    },

    /// 无法识别的restype/ctype或元素
    UnexpectedSchema {
        /// 出错的字段（restype、ctype、element...）
        kind: String,
        /// 实际遇到的值
        value: String,
    },

    /// 文件操作相关错误
    FileOperation {
        /// 文件路径
        path: String,
        /// 操作类型（读取、写入、创建等）
        operation: String,
        /// 底层错误信息
        source: String,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 输入验证错误
    InputValidation {
        /// 输入值
        input: String,
        /// 验证失败原因
        reason: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal {
        /// 包装的错误
        source: AnyhowError,
    },
}

impl fmt::Display for XliffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XliffError::HtmlParse { details } => {
                write!(f, "HTML解析失败: {}", details)
            }
            XliffError::XliffParse { details } => {
                write!(f, "XLIFF解析失败: {}", details)
            }
            XliffError::UnexpectedSchema { kind, value } => {
                write!(f, "无法识别的{}: {}", kind, value)
            }
            XliffError::FileOperation {
                path,
                operation,
                source,
            } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path, source)
            }
            XliffError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            XliffError::InputValidation { input, reason } => {
                write!(f, "输入验证失败 [{}]: {}", input, reason)
            }
            XliffError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            }
        }
    }
}

impl std::error::Error for XliffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XliffError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// html-xliff 结果类型别名
pub type Result<T> = std::result::Result<T, XliffError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! xliff_error {
    (html_parse, $details:expr) => {
        $crate::error::XliffError::HtmlParse {
            details: $details.to_string(),
        }
    };
    (xliff_parse, $details:expr) => {
        $crate::error::XliffError::XliffParse {
            details: $details.to_string(),
        }
    };
    (schema, $kind:expr, $value:expr) => {
        $crate::error::XliffError::UnexpectedSchema {
            kind: $kind.to_string(),
            value: $value.to_string(),
        }
    };
    (file_op, $path:expr, $op:expr, $source:expr) => {
        $crate::error::XliffError::FileOperation {
            path: $path.to_string(),
            operation: $op.to_string(),
            source: $source.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::XliffError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (input_validation, $input:expr, $reason:expr) => {
        $crate::error::XliffError::InputValidation {
            input: $input.to_string(),
            reason: $reason.to_string(),
        }
    };
}

/// 从anyhow::Error转换为XliffError
impl From<AnyhowError> for XliffError {
    fn from(error: AnyhowError) -> Self {
        XliffError::Internal { source: error }
    }
}

/// 从std::io::Error转换为XliffError
impl From<std::io::Error> for XliffError {
    fn from(error: std::io::Error) -> Self {
        XliffError::FileOperation {
            path: "unknown".to_string(),
            operation: "io".to_string(),
            source: error.to_string(),
        }
    }
}

/// 从quick_xml::Error转换为XliffError
impl From<quick_xml::Error> for XliffError {
    fn from(error: quick_xml::Error) -> Self {
        XliffError::XliffParse {
            details: error.to_string(),
        }
    }
}
