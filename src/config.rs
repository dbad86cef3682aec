//! 配置管理模块
//!
//! 提供CLI参数解析和转换配置管理功能

// 标准库导入
use std::path::PathBuf;

// 第三方crate导入
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use regex::Regex;

// 本地模块导入
use crate::error::Result;
use crate::xliff_error;

/// 默认翻译键属性
pub const DEFAULT_KEY_ATTRIBUTE: &str = "data-l10n-id";
/// 默认源语言
pub const DEFAULT_SOURCE_LANGUAGE: &str = "en";

static LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{1,8})*$").expect("语言代码正则表达式无效")
});

/// 转换配置结构体
///
/// 支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use html_xliff::config::ConversionConfig;
///
/// let config = ConversionConfig::new()
///     .source_language("en")
///     .target_language("fr")
///     .key_attribute("data-l10n-id")
///     .original("index.html");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// 源语言（HTML根元素的lang优先）
    source_lang: String,
    /// 目标语言
    target_lang: Option<String>,
    /// 翻译键属性名
    key_attr: String,
    /// 写入 `original` 的源文件名
    original_name: String,
    /// 硬换行替换记号
    hard_linebreak: Option<String>,
    /// `&` 替换记号
    ampersand: Option<String>,
}

impl ConversionConfig {
    /// 创建新的配置实例
    ///
    /// 默认值：
    /// - 源语言: 英文 ("en")
    /// - 目标语言: 无
    /// - 翻译键属性: `data-l10n-id`
    /// - 源文件名: `document.html`
    pub fn new() -> Self {
        Self {
            source_lang: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_lang: None,
            key_attr: DEFAULT_KEY_ATTRIBUTE.to_string(),
            original_name: "document.html".to_string(),
            hard_linebreak: None,
            ampersand: None,
        }
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn target_lang(&self) -> Option<&str> {
        self.target_lang.as_deref()
    }

    pub fn key_attr(&self) -> &str {
        &self.key_attr
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn hard_linebreak_token(&self) -> Option<&str> {
        self.hard_linebreak.as_deref()
    }

    pub fn ampersand_token(&self) -> Option<&str> {
        self.ampersand.as_deref()
    }

    /// 设置源语言
    pub fn source_language(mut self, lang: &str) -> Self {
        self.source_lang = lang.to_string();
        self
    }

    /// 设置目标语言
    pub fn target_language(mut self, lang: &str) -> Self {
        self.target_lang = Some(lang.to_string());
        self
    }

    /// 设置翻译键属性名
    pub fn key_attribute(mut self, name: &str) -> Self {
        self.key_attr = name.to_ascii_lowercase();
        self
    }

    /// 设置源文件名
    pub fn original(mut self, name: &str) -> Self {
        self.original_name = name.to_string();
        self
    }

    /// 设置硬换行替换记号
    pub fn hard_linebreak(mut self, token: &str) -> Self {
        self.hard_linebreak = Some(token.to_string());
        self
    }

    /// 设置 `&` 替换记号
    pub fn ampersand(mut self, token: &str) -> Self {
        self.ampersand = Some(token.to_string());
        self
    }

    /// 检查配置项
    pub fn validate(&self) -> Result<()> {
        validate_language(&self.source_lang)?;
        if let Some(target) = &self.target_lang {
            validate_language(target)?;
        }
        if self.key_attr.is_empty() || self.key_attr.contains(char::is_whitespace) {
            return Err(xliff_error!(config, "key_attribute", "属性名不能为空或包含空白"));
        }
        if self.original_name.is_empty() {
            return Err(xliff_error!(config, "original", "源文件名不能为空"));
        }
        Ok(())
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 检查语言代码格式
pub fn validate_language(lang: &str) -> Result<()> {
    if LANGUAGE_TAG.is_match(lang) {
        Ok(())
    } else {
        Err(xliff_error!(input_validation, lang, "不是有效的语言代码"))
    }
}

/// CLI参数结构
#[derive(Parser)]
#[command(author, version, about = "HTML ⇄ XLIFF 1.2 转换工具 - 支持译文合并与孤儿单元调和", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// 显示性能统计
    #[arg(long, global = true)]
    pub stats: bool,
}

/// 子命令
#[derive(Subcommand)]
pub enum Command {
    /// 从HTML文件或目录提取XLIFF
    Extract {
        /// 输入HTML文件或目录
        #[arg(short, long, value_name = "FILE_OR_DIR")]
        input: PathBuf,

        /// 输出文件或目录 (可选，默认与输入同目录)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// 源语言代码 (HTML根元素的lang优先)
        #[arg(long, default_value = DEFAULT_SOURCE_LANGUAGE)]
        source_lang: String,

        /// 目标语言代码
        #[arg(long)]
        target_lang: Option<String>,

        /// 翻译键属性名
        #[arg(long, default_value = DEFAULT_KEY_ATTRIBUTE)]
        key_attr: String,
    },

    /// 把XLIFF渲染回HTML
    Render {
        /// 输入XLIFF文件
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// 输出HTML文件 (可选)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// 翻译键属性名
        #[arg(long, default_value = DEFAULT_KEY_ATTRIBUTE)]
        key_attr: String,
    },

    /// 把新提取的XLIFF合并进已发布的XLIFF
    Merge {
        /// 已发布的XLIFF
        #[arg(long, value_name = "FILE")]
        old: PathBuf,

        /// 新提取的XLIFF
        #[arg(long, value_name = "FILE")]
        fresh: PathBuf,

        /// 合并结果输出路径 (可选，默认覆盖old)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// 以JSON输出合并报告
        #[arg(long)]
        json: bool,

        /// 注释中使用的日期 (YYYY-MM-DD，默认今天)
        #[arg(long)]
        date: Option<String>,
    },
}
