//! restype/ctype 对照表与id分配器
//!
//! 正向与反向转换共用同一张表：每个 (标签, 上下文) 只对应一个restype，
//! 每个restype/ctype也只对应一个标签。

// 标准库导入
use std::collections::HashSet;

// 第三方crate导入
use once_cell::sync::Lazy;
use regex::Regex;

// 本地模块导入
use crate::error::Result;
use crate::xliff_error;

/// 默认restype/ctype前缀
pub const HTML_PREFIX: &str = "x-html-";
/// 直接位于Group中的内联文本段，不以 `x-html-` 开头，避免与标签名冲突
pub const TEXT_RUN_RESTYPE: &str = "x-text-run";
/// 强制换行
pub const CTYPE_LINE_BREAK: &str = "lb";
/// 图片
pub const CTYPE_IMAGE: &str = "image";
/// 合成id前缀
pub const GENID_PREFIX: &str = "genid-";

/// 使用裸名称的restype
const RESTYPE_OVERRIDES: &[(&str, &str)] = &[
    ("table", "table"),
    ("tr", "row"),
    ("td", "cell"),
    ("head", "header"),
    ("form", "dialog"),
];

/// 与其他标签共享restype的标签，反向时依靠 `lx:element` 还原
const SHARED_RESTYPES: &[(&str, &str)] = &[("th", "cell")];

/// 使用XLIFF语义名称的内联ctype
const CTYPE_OVERRIDES: &[(&str, &str)] = &[
    ("b", "bold"),
    ("i", "italic"),
    ("u", "underlined"),
    ("a", "link"),
];

/// 可通过子流携带的带外属性
pub const OUT_OF_BAND_ATTRIBUTES: &[&str] = &["title", "alt"];

/// 内联元素：在可翻译元素内部展开为 g/x/ph
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "br", "cite", "code", "data", "del",
    "dfn", "em", "font", "i", "img", "ins", "kbd", "label", "mark", "nobr", "q", "rb", "rp",
    "rt", "rtc", "ruby", "s", "samp", "small", "span", "strike", "strong", "sub", "sup",
    "time", "tt", "u", "var", "wbr",
];

/// 纯容器：总是成为Group
const CONTAINER_TAGS: &[&str] = &[
    "html", "head", "body", "table", "thead", "tbody", "tfoot", "tr", "colgroup", "form",
    "ul", "ol", "dl", "menu", "frameset",
];

/// 空元素：没有内容，只有属性
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// 原始文本元素：内容是代码而不是文字，原样保存且不参与翻译
const RAW_TEXT_TAGS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// 保留空白的元素
const PREFORMATTED_TAGS: &[&str] = &["pre", "listing", "textarea"];

/// 其余已知的块级标签
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "button", "canvas", "caption",
    "center", "datalist", "dd", "details", "dialog", "div", "dt", "fieldset", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "legend",
    "li", "listing", "main", "map", "math", "meter", "nav", "noscript", "object", "optgroup",
    "option", "output", "p", "picture", "pre", "progress", "search", "section", "select",
    "slot", "summary", "svg", "td", "template", "textarea", "th", "title", "video", "frame",
];

/// HTML分词器接受的标签名：字母开头，不含空白、`/` 与 `>`
static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][^\s/>A-Z]*$").expect("标签名正则表达式无效"));

/// 标签是否属于已知词表；词表外的标签按默认规则处理
pub fn is_known_tag(tag: &str) -> bool {
    INLINE_TAGS.contains(&tag)
        || CONTAINER_TAGS.contains(&tag)
        || VOID_TAGS.contains(&tag)
        || RAW_TEXT_TAGS.contains(&tag)
        || BLOCK_TAGS.contains(&tag)
}

/// 是否可以出现在 `x-html-<标签>` 中
pub fn is_valid_tag_name(tag: &str) -> bool {
    TAG_NAME.is_match(tag)
}

pub fn is_inline_tag(tag: &str) -> bool {
    INLINE_TAGS.contains(&tag)
}

pub fn is_container_tag(tag: &str) -> bool {
    CONTAINER_TAGS.contains(&tag)
}

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

pub fn is_raw_text_tag(tag: &str) -> bool {
    RAW_TEXT_TAGS.contains(&tag)
}

pub fn is_preformatted_tag(tag: &str) -> bool {
    PREFORMATTED_TAGS.contains(&tag)
}

/// 内容不参与翻译的元素：空元素与原始文本元素
pub fn is_opaque_tag(tag: &str) -> bool {
    is_void_tag(tag) || is_raw_text_tag(tag)
}

/// 元素的restype，以及共享restype时需要记录的原始标签
pub fn restype_for(tag: &str) -> (String, Option<String>) {
    if let Some((_, restype)) = RESTYPE_OVERRIDES.iter().find(|(t, _)| *t == tag) {
        return (restype.to_string(), None);
    }
    if let Some((_, restype)) = SHARED_RESTYPES.iter().find(|(t, _)| *t == tag) {
        return (restype.to_string(), Some(tag.to_string()));
    }
    (format!("{}{}", HTML_PREFIX, tag), None)
}

/// restype反查标签；`element` 为 `lx:element` 提示
pub fn tag_for_restype(restype: &str, element: Option<&str>) -> Result<String> {
    if let Some(hint) = element {
        if SHARED_RESTYPES
            .iter()
            .any(|(tag, shared)| *tag == hint && *shared == restype)
        {
            return Ok(hint.to_string());
        }
        return Err(xliff_error!(schema, "element", format!("{} ({})", hint, restype)));
    }
    if let Some((tag, _)) = RESTYPE_OVERRIDES.iter().find(|(_, r)| *r == restype) {
        return Ok(tag.to_string());
    }
    match prefixed_tag(restype) {
        // 裸名称或共享restype的标签不接受默认前缀形式
        Some(tag)
            if RESTYPE_OVERRIDES.iter().any(|(t, _)| *t == tag)
                || SHARED_RESTYPES.iter().any(|(t, _)| *t == tag) =>
        {
            Err(xliff_error!(schema, "restype", restype))
        }
        Some(tag) => Ok(tag),
        None => Err(xliff_error!(schema, "restype", restype)),
    }
}

/// 内联元素的ctype
pub fn ctype_for(tag: &str) -> String {
    match tag {
        "br" => CTYPE_LINE_BREAK.to_string(),
        "img" => CTYPE_IMAGE.to_string(),
        _ => CTYPE_OVERRIDES
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, ctype)| ctype.to_string())
            .unwrap_or_else(|| format!("{}{}", HTML_PREFIX, tag)),
    }
}

/// ctype反查标签
pub fn tag_for_ctype(ctype: &str) -> Result<String> {
    match ctype {
        CTYPE_LINE_BREAK => return Ok("br".to_string()),
        CTYPE_IMAGE => return Ok("img".to_string()),
        _ => {}
    }
    if let Some((tag, _)) = CTYPE_OVERRIDES.iter().find(|(_, c)| *c == ctype) {
        return Ok(tag.to_string());
    }
    match prefixed_tag(ctype) {
        // 有语义名称的标签不接受默认前缀形式，保证一一对应
        Some(tag)
            if tag == "br" || tag == "img" || CTYPE_OVERRIDES.iter().any(|(t, _)| *t == tag) =>
        {
            Err(xliff_error!(schema, "ctype", ctype))
        }
        Some(tag) => Ok(tag),
        None => Err(xliff_error!(schema, "ctype", ctype)),
    }
}

/// 子流的ctype：`x-html-<标签>-<属性>`
pub fn sub_ctype_for(tag: &str, attribute: &str) -> String {
    format!("{}{}-{}", HTML_PREFIX, tag, attribute)
}

/// 解析子流ctype，返回 (标签, 属性)
///
/// 标签名本身可以含 `-`，因此从末尾匹配属性名。
pub fn parse_sub_ctype(ctype: &str) -> Result<(String, String)> {
    let rest = ctype
        .strip_prefix(HTML_PREFIX)
        .ok_or_else(|| xliff_error!(schema, "sub ctype", ctype))?;
    OUT_OF_BAND_ATTRIBUTES
        .iter()
        .find_map(|attribute| {
            let tag = rest.strip_suffix(attribute)?.strip_suffix('-')?;
            is_valid_tag_name(tag).then(|| (tag.to_string(), attribute.to_string()))
        })
        .ok_or_else(|| xliff_error!(schema, "sub ctype", ctype))
}

/// 去掉默认前缀得到标签名
fn prefixed_tag(value: &str) -> Option<String> {
    let tag = value.strip_prefix(HTML_PREFIX)?;
    is_valid_tag_name(tag).then(|| tag.to_string())
}

/// 单次转换调用内的id分配器
///
/// 计数器和已用id集合都属于一次调用，翻译键id与合成id共用同一个集合。
#[derive(Debug, Default)]
pub struct IdAllocator {
    counter: u64,
    used: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为TransUnit分配id：有翻译键时使用键值，否则消耗一个计数
    pub fn unit_id(&mut self, key: Option<&str>) -> String {
        match key {
            Some(key) => self.claim(key),
            None => self.next_generated(),
        }
    }

    /// 为内联标记（g/x/ph）分配id
    pub fn marker_id(&mut self) -> String {
        self.next_generated()
    }

    /// 已分配的合成计数
    pub fn generated_count(&self) -> u64 {
        self.counter
    }

    fn next_generated(&mut self) -> String {
        self.counter += 1;
        let candidate = format!("{}{}", GENID_PREFIX, self.counter);
        self.claim(&candidate)
    }

    /// 登记id；重复时追加最小的未用后缀 `-1, -2, …`
    fn claim(&mut self, candidate: &str) -> String {
        let id = if self.used.contains(candidate) {
            let mut suffix = 1u64;
            loop {
                let next = format!("{}-{}", candidate, suffix);
                if !self.used.contains(&next) {
                    break next;
                }
                suffix += 1;
            }
        } else {
            candidate.to_string()
        };
        let inserted = self.used.insert(id.clone());
        assert!(inserted, "id在消歧之后仍然重复: {}", id);
        id
    }
}
