//! XLIFF 1.2 数据模型
//!
//! 文件头、body中的单元树（Group / TransUnit）以及内联内容。
//! 转换器每次调用都会新建一个 [`XliffDocument`]；只有译文单元库在调和时才会改写已有的id。

use indexmap::IndexMap;

/// 带命名空间的HTML来源属性，按首次插入顺序保存，重复设置会原地覆盖
pub type HtmlAttributes = IndexMap<String, String>;

/// 默认的数据类型
pub const DATATYPE_HTML: &str = "html";

/// XLIFF文档：`file` 头加上 `body` 中的单元序列
#[derive(Debug, Clone, PartialEq)]
pub struct XliffDocument {
    /// 源文件名（`original` 属性）
    pub original: String,
    /// 数据类型，固定为 `html`
    pub datatype: String,
    pub source_language: String,
    pub target_language: Option<String>,
    /// 硬换行的替换记号
    pub hard_linebreak: Option<String>,
    /// `&` 的替换记号
    pub ampersand: Option<String>,
    pub body: Vec<Unit>,
}

impl XliffDocument {
    pub fn new(original: &str, source_language: &str) -> Self {
        Self {
            original: original.to_string(),
            datatype: DATATYPE_HTML.to_string(),
            source_language: source_language.to_string(),
            target_language: None,
            hard_linebreak: None,
            ampersand: None,
            body: Vec::new(),
        }
    }

    /// 按文档顺序列出全部TransUnit
    pub fn trans_units(&self) -> Vec<&TransUnit> {
        let mut units = Vec::new();
        collect_trans_units(&self.body, &mut units);
        units
    }

    /// 按文档顺序遍历全部TransUnit（可变）
    pub fn for_each_trans_unit_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut TransUnit),
    {
        visit_trans_units_mut(&mut self.body, &mut f);
    }

    pub fn find(&self, id: &str) -> Option<&TransUnit> {
        self.trans_units().into_iter().find(|unit| unit.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut TransUnit> {
        find_trans_unit_mut(&mut self.body, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

fn collect_trans_units<'a>(units: &'a [Unit], out: &mut Vec<&'a TransUnit>) {
    for unit in units {
        match unit {
            Unit::Group(group) => collect_trans_units(&group.children, out),
            Unit::TransUnit(trans_unit) => out.push(trans_unit),
        }
    }
}

fn visit_trans_units_mut<F>(units: &mut [Unit], f: &mut F)
where
    F: FnMut(&mut TransUnit),
{
    for unit in units {
        match unit {
            Unit::Group(group) => visit_trans_units_mut(&mut group.children, f),
            Unit::TransUnit(trans_unit) => f(trans_unit),
        }
    }
}

fn find_trans_unit_mut<'a>(units: &'a mut [Unit], id: &str) -> Option<&'a mut TransUnit> {
    for unit in units {
        match unit {
            Unit::Group(group) => {
                if let Some(found) = find_trans_unit_mut(&mut group.children, id) {
                    return Some(found);
                }
            }
            Unit::TransUnit(trans_unit) => {
                if trans_unit.id == id {
                    return Some(trans_unit);
                }
            }
        }
    }
    None
}

/// body树中的节点
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Group(Group),
    TransUnit(TransUnit),
}

impl Unit {
    pub fn restype(&self) -> &str {
        match self {
            Unit::Group(group) => &group.restype,
            Unit::TransUnit(trans_unit) => &trans_unit.restype,
        }
    }
}

/// 纯结构容器，自身不带可翻译文本
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub restype: String,
    pub attributes: HtmlAttributes,
    /// 共享restype时记录的原始标签（例如 `th`）
    pub element: Option<String>,
    pub children: Vec<Unit>,
}

/// 可翻译叶子
#[derive(Debug, Clone, PartialEq)]
pub struct TransUnit {
    pub id: String,
    /// 来自翻译键属性的原始键值
    pub resname: Option<String>,
    pub restype: String,
    pub attributes: HtmlAttributes,
    pub element: Option<String>,
    pub source: Variant,
    pub target: Option<Variant>,
    pub notes: Vec<Note>,
    /// 运行时发现而非静态扫描得到
    pub dynamic: bool,
    pub approved: bool,
    /// `translate="no"`：原样保存的代码或空白
    pub translate: bool,
}

impl TransUnit {
    pub fn new(id: &str, restype: &str, source: Variant) -> Self {
        Self {
            id: id.to_string(),
            resname: None,
            restype: restype.to_string(),
            attributes: HtmlAttributes::new(),
            element: None,
            source,
            target: None,
            notes: Vec::new(),
            dynamic: false,
            approved: false,
            translate: true,
        }
    }

    /// id最后一个 `.` 之后的部分
    pub fn terminal_id(&self) -> &str {
        terminal_component(&self.id)
    }

    pub fn source_text(&self) -> String {
        self.source.plain_text()
    }

    /// 优先返回译文，没有译文时返回原文
    pub fn effective_variant(&self) -> &Variant {
        self.target.as_ref().unwrap_or(&self.source)
    }
}

/// 层级id的末段
pub fn terminal_component(id: &str) -> &str {
    match id.rfind('.') {
        Some(pos) => &id[pos + 1..],
        None => id,
    }
}

/// 原文或译文
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variant {
    pub language: String,
    pub content: Vec<Inline>,
}

impl Variant {
    pub fn new(language: &str, content: Vec<Inline>) -> Self {
        Self {
            language: language.to_string(),
            content,
        }
    }

    pub fn text(language: &str, text: &str) -> Self {
        Self::new(language, vec![Inline::Text(text.to_string())])
    }

    /// 展平为纯文本，换行标记取其 `equiv-text`
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        flatten_inline(&self.content, &mut out);
        out
    }
}

fn flatten_inline(content: &[Inline], out: &mut String) {
    for inline in content {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Span(span) => flatten_inline(&span.content, out),
            Inline::Marker(marker) => {
                if let Some(equiv) = &marker.equiv_text {
                    out.push_str(equiv);
                }
            }
            // ph 的内容是原生代码
            Inline::Placeholder(_) => {}
        }
    }
}

/// 内联内容
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    /// `g`
    Span(Span),
    /// `x`
    Marker(Marker),
    /// `ph`
    Placeholder(Placeholder),
}

/// 成对标记 `g`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub id: String,
    pub ctype: String,
    /// 直接写成 `xml:lang`
    pub lang: Option<String>,
    pub attributes: HtmlAttributes,
    pub content: Vec<Inline>,
}

/// 独立标记 `x`（图片、强制换行）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Marker {
    pub id: String,
    pub ctype: String,
    pub attributes: HtmlAttributes,
    /// 换行所代表的空白
    pub equiv_text: Option<String>,
}

/// 占位符 `ph`，携带带外属性文本或内联的原始文本元素
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placeholder {
    pub id: String,
    /// 没有ctype时，子流属性归属于外层元素
    pub ctype: Option<String>,
    pub attributes: HtmlAttributes,
    pub content: Vec<Inline>,
    pub subs: Vec<SubFlow>,
}

/// 子流 `sub`：一个带外属性的文本
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubFlow {
    pub ctype: String,
    pub text: String,
}

/// 注释
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Note {
    pub from: Option<String>,
    pub text: String,
}

impl Note {
    pub fn new(from: &str, text: &str) -> Self {
        Self {
            from: Some(from.to_string()),
            text: text.to_string(),
        }
    }
}
