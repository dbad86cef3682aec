//! XLIFF 1.2 读写
//!
//! 写出时HTML来源属性放在 `h` 命名空间，标志位（dynamic、element、替换记号）
//! 放在 `lx` 命名空间；`approved`、`translate` 与 `resname` 使用XLIFF原生属性。
//! 文本与属性值的转义交给quick-xml完成。
//!
//! XLIFF 1.2 的 `group` 至少要有一个子单元，因此没有子节点的Group写成带
//! `lx:empty-group` 标志、原文为空的 `trans-unit translate="no"`，读入时还原。

// 标准库导入
use std::borrow::Cow;
use std::collections::HashSet;

// 第三方crate导入
use once_cell::sync::Lazy;
use quick_xml::escape::{escape, resolve_xml_entity};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::{NsReader, Writer};
use regex::{Captures, Regex};
use tracing::debug;

// 本地模块导入
use crate::error::Result;
use crate::xliff::{
    Group, HtmlAttributes, Inline, Marker, Note, Placeholder, Span, SubFlow, TransUnit, Unit,
    Variant, XliffDocument, DATATYPE_HTML,
};
use crate::xliff_error;

pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";
/// HTML来源属性的命名空间
pub const HTML_ATTR_NAMESPACE: &str = "urn:x-html-xliff:html";
/// 扩展标志的命名空间
pub const EXTENSION_NAMESPACE: &str = "urn:x-html-xliff:extensions";
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

const HTML_PREFIX: &str = "h";
const INDENT: &str = "  ";
/// 空Group占位单元的id前缀
const EMPTY_GROUP_ID_PREFIX: &str = "lx-empty-";

/// 属性名中转义过的字符
static ESCAPED_NAME_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_x([0-9A-F]{4,6})_").expect("属性名转义正则表达式无效"));

// ============================================================================
// 写出
// ============================================================================

/// 序列化XLIFF文档
pub fn write_xliff(doc: &XliffDocument) -> Result<String> {
    let mut out = XliffWriter {
        writer: Writer::new(Vec::new()),
        used_ids: doc.trans_units().iter().map(|unit| unit.id.clone()).collect(),
        empty_groups: 0,
    };
    out.write_document(doc)?;
    String::from_utf8(out.writer.into_inner())
        .map_err(|e| xliff_error!(xliff_parse, format!("UTF-8转换失败: {}", e)))
}

struct XliffWriter {
    writer: Writer<Vec<u8>>,
    /// 文档中已有的单元id，空Group的占位id不能与之重复
    used_ids: HashSet<String>,
    empty_groups: u64,
}

impl XliffWriter {
    fn write_document(&mut self, doc: &XliffDocument) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.newline(0)?;

        let mut xliff = BytesStart::new("xliff");
        push_attr(&mut xliff, "version", "1.2");
        push_attr(&mut xliff, "xmlns", XLIFF_NAMESPACE);
        push_attr(&mut xliff, "xmlns:h", HTML_ATTR_NAMESPACE);
        push_attr(&mut xliff, "xmlns:lx", EXTENSION_NAMESPACE);
        self.writer.write_event(Event::Start(xliff))?;

        let mut file = BytesStart::new("file");
        push_attr(&mut file, "original", doc.original.as_str());
        push_attr(&mut file, "datatype", doc.datatype.as_str());
        push_attr(&mut file, "source-language", doc.source_language.as_str());
        if let Some(target) = &doc.target_language {
            push_attr(&mut file, "target-language", target.as_str());
        }
        if let Some(token) = &doc.hard_linebreak {
            push_attr(&mut file, "lx:hard-linebreak", token.as_str());
        }
        if let Some(token) = &doc.ampersand {
            push_attr(&mut file, "lx:ampersand", token.as_str());
        }
        self.newline(1)?;
        self.writer.write_event(Event::Start(file))?;
        self.newline(2)?;
        self.writer.write_event(Event::Start(BytesStart::new("body")))?;

        for unit in &doc.body {
            self.write_unit(unit, 3)?;
        }

        self.newline(2)?;
        self.writer.write_event(Event::End(BytesEnd::new("body")))?;
        self.newline(1)?;
        self.writer.write_event(Event::End(BytesEnd::new("file")))?;
        self.newline(0)?;
        self.writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        self.newline(0)?;
        Ok(())
    }

    fn newline(&mut self, depth: usize) -> Result<()> {
        let text = format!("\n{}", INDENT.repeat(depth));
        self.writer.write_event(Event::Text(BytesText::new(&text)))?;
        Ok(())
    }

    fn write_unit(&mut self, unit: &Unit, depth: usize) -> Result<()> {
        match unit {
            Unit::Group(group) => self.write_group(group, depth),
            Unit::TransUnit(trans_unit) => self.write_trans_unit(trans_unit, depth),
        }
    }

    fn write_group(&mut self, group: &Group, depth: usize) -> Result<()> {
        if group.children.is_empty() {
            return self.write_empty_group(group, depth);
        }

        let mut start = BytesStart::new("group");
        push_attr(&mut start, "restype", group.restype.as_str());
        if let Some(element) = &group.element {
            push_attr(&mut start, "lx:element", element.as_str());
        }
        push_html_attributes(&mut start, &group.attributes);

        self.newline(depth)?;
        self.writer.write_event(Event::Start(start))?;
        for child in &group.children {
            self.write_unit(child, depth + 1)?;
        }
        self.newline(depth)?;
        self.writer.write_event(Event::End(BytesEnd::new("group")))?;
        Ok(())
    }

    fn write_empty_group(&mut self, group: &Group, depth: usize) -> Result<()> {
        let id = self.next_empty_group_id();
        let mut start = BytesStart::new("trans-unit");
        push_attr(&mut start, "id", id.as_str());
        push_attr(&mut start, "restype", group.restype.as_str());
        push_attr(&mut start, "translate", "no");
        push_attr(&mut start, "lx:empty-group", "yes");
        if let Some(element) = &group.element {
            push_attr(&mut start, "lx:element", element.as_str());
        }
        push_html_attributes(&mut start, &group.attributes);

        self.newline(depth)?;
        self.writer.write_event(Event::Start(start))?;
        self.writer
            .write_event(Event::Empty(BytesStart::new("source")))?;
        self.writer
            .write_event(Event::End(BytesEnd::new("trans-unit")))?;
        Ok(())
    }

    fn next_empty_group_id(&mut self) -> String {
        loop {
            self.empty_groups += 1;
            let id = format!("{}{}", EMPTY_GROUP_ID_PREFIX, self.empty_groups);
            if self.used_ids.insert(id.clone()) {
                return id;
            }
        }
    }

    fn write_trans_unit(&mut self, unit: &TransUnit, depth: usize) -> Result<()> {
        let mut start = BytesStart::new("trans-unit");
        push_attr(&mut start, "id", unit.id.as_str());
        if let Some(resname) = &unit.resname {
            push_attr(&mut start, "resname", resname.as_str());
        }
        push_attr(&mut start, "restype", unit.restype.as_str());
        if unit.approved {
            push_attr(&mut start, "approved", "yes");
        }
        if !unit.translate {
            push_attr(&mut start, "translate", "no");
        }
        if unit.dynamic {
            push_attr(&mut start, "lx:dynamic", "yes");
        }
        if let Some(element) = &unit.element {
            push_attr(&mut start, "lx:element", element.as_str());
        }
        push_attr(&mut start, "xml:space", "preserve");
        push_html_attributes(&mut start, &unit.attributes);

        self.newline(depth)?;
        self.writer.write_event(Event::Start(start))?;

        self.newline(depth + 1)?;
        self.write_variant("source", &unit.source)?;
        if let Some(target) = &unit.target {
            self.newline(depth + 1)?;
            self.write_variant("target", target)?;
        }
        for note in &unit.notes {
            self.newline(depth + 1)?;
            let mut start = BytesStart::new("note");
            if let Some(from) = &note.from {
                push_attr(&mut start, "from", from.as_str());
            }
            self.writer.write_event(Event::Start(start))?;
            self.writer
                .write_event(Event::Text(BytesText::new(&note.text)))?;
            self.writer.write_event(Event::End(BytesEnd::new("note")))?;
        }

        self.newline(depth)?;
        self.writer
            .write_event(Event::End(BytesEnd::new("trans-unit")))?;
        Ok(())
    }

    fn write_variant(&mut self, name: &str, variant: &Variant) -> Result<()> {
        let mut start = BytesStart::new(name);
        push_attr(&mut start, "xml:lang", variant.language.as_str());
        self.writer.write_event(Event::Start(start))?;
        self.write_inline(&variant.content)?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_inline(&mut self, content: &[Inline]) -> Result<()> {
        for inline in content {
            match inline {
                Inline::Text(text) => {
                    self.writer.write_event(Event::Text(BytesText::new(text)))?;
                }
                Inline::Span(span) => {
                    let mut start = BytesStart::new("g");
                    push_attr(&mut start, "id", span.id.as_str());
                    push_attr(&mut start, "ctype", span.ctype.as_str());
                    if let Some(lang) = &span.lang {
                        push_attr(&mut start, "xml:lang", lang.as_str());
                    }
                    push_html_attributes(&mut start, &span.attributes);
                    self.writer.write_event(Event::Start(start))?;
                    self.write_inline(&span.content)?;
                    self.writer.write_event(Event::End(BytesEnd::new("g")))?;
                }
                Inline::Marker(marker) => {
                    let mut start = BytesStart::new("x");
                    push_attr(&mut start, "id", marker.id.as_str());
                    push_attr(&mut start, "ctype", marker.ctype.as_str());
                    if let Some(equiv) = &marker.equiv_text {
                        push_attr(&mut start, "equiv-text", equiv.as_str());
                    }
                    push_html_attributes(&mut start, &marker.attributes);
                    self.writer.write_event(Event::Empty(start))?;
                }
                Inline::Placeholder(placeholder) => {
                    let mut start = BytesStart::new("ph");
                    push_attr(&mut start, "id", placeholder.id.as_str());
                    if let Some(ctype) = &placeholder.ctype {
                        push_attr(&mut start, "ctype", ctype.as_str());
                    }
                    push_html_attributes(&mut start, &placeholder.attributes);
                    self.writer.write_event(Event::Start(start))?;
                    self.write_inline(&placeholder.content)?;
                    for sub in &placeholder.subs {
                        let mut start = BytesStart::new("sub");
                        push_attr(&mut start, "ctype", sub.ctype.as_str());
                        self.writer.write_event(Event::Start(start))?;
                        self.writer
                            .write_event(Event::Text(BytesText::new(&sub.text)))?;
                        self.writer.write_event(Event::End(BytesEnd::new("sub")))?;
                    }
                    self.writer.write_event(Event::End(BytesEnd::new("ph")))?;
                }
            }
        }
        Ok(())
    }
}

fn push_html_attributes(start: &mut BytesStart<'_>, attributes: &HtmlAttributes) {
    for (key, value) in attributes {
        let name = format!("{}:{}", HTML_PREFIX, encode_attribute_name(key));
        push_attr(start, &name, value);
    }
}

/// HTML属性名写成XML名称：`v-on:click` → `v-on_x003A_click`
///
/// 名称中不能出现的字符写成 `_xHHHH_`；后面紧跟 `x` 的 `_` 也要转义，保证可逆。
fn encode_attribute_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut first = true;
    while let Some(ch) = chars.next() {
        let plain = match ch {
            'A'..='Z' | 'a'..='z' => true,
            '0'..='9' | '.' | '-' => !first,
            '_' => chars.peek() != Some(&'x'),
            _ => false,
        };
        if plain {
            out.push(ch);
        } else {
            out.push_str(&format!("_x{:04X}_", ch as u32));
        }
        first = false;
    }
    out
}

fn decode_attribute_name(name: &str) -> String {
    ESCAPED_NAME_CHAR
        .replace_all(name, |caps: &Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// 写入属性；换行与制表符写成字符引用
fn push_attr(start: &mut BytesStart<'_>, name: &str, value: &str) {
    let escaped = escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;");
    start.push_attribute(Attribute {
        key: QName(name.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    });
}

// ============================================================================
// 读取
// ============================================================================

/// 属性所在的命名空间
#[derive(Debug, Clone, PartialEq)]
enum AttrSpace {
    Plain,
    Html,
    Extension,
    Xml,
    Other,
}

#[derive(Debug)]
struct XmlElement {
    name: String,
    attrs: Vec<(AttrSpace, String, String)>,
    children: Vec<XmlContent>,
}

#[derive(Debug)]
enum XmlContent {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    fn attr(&self, space: AttrSpace, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(s, n, _)| *s == space && n == name)
            .map(|(_, _, v)| v.as_str())
    }

    fn plain(&self, name: &str) -> Option<&str> {
        self.attr(AttrSpace::Plain, name)
    }

    fn required(&self, name: &str) -> Result<String> {
        self.plain(name).map(str::to_string).ok_or_else(|| {
            xliff_error!(xliff_parse, format!("<{}> 缺少属性 {}", self.name, name))
        })
    }

    fn flag(&self, space: AttrSpace, name: &str) -> bool {
        matches!(self.attr(space, name), Some("yes") | Some("true"))
    }

    fn html_attributes(&self) -> HtmlAttributes {
        self.attrs
            .iter()
            .filter(|(space, _, _)| *space == AttrSpace::Html)
            .map(|(_, name, value)| (decode_attribute_name(name), value.clone()))
            .collect()
    }

    fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlContent::Element(element) => Some(element),
            XmlContent::Text(_) => None,
        })
    }

    fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|child| child.name == name)
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                XmlContent::Text(text) => out.push_str(text),
                XmlContent::Element(element) => out.push_str(&element.text_content()),
            }
        }
        out
    }
}

/// 解析XLIFF文档
pub fn read_xliff(input: &str) -> Result<XliffDocument> {
    let root = parse_tree(input)?;
    if root.name != "xliff" {
        return Err(xliff_error!(schema, "element", root.name));
    }
    let file = root
        .find_child("file")
        .ok_or_else(|| xliff_error!(xliff_parse, "缺少 <file> 元素"))?;

    let mut doc = XliffDocument::new(&file.required("original")?, &file.required("source-language")?);
    doc.datatype = file
        .plain("datatype")
        .unwrap_or(DATATYPE_HTML)
        .to_string();
    doc.target_language = file.plain("target-language").map(str::to_string);
    doc.hard_linebreak = file
        .attr(AttrSpace::Extension, "hard-linebreak")
        .map(str::to_string);
    doc.ampersand = file
        .attr(AttrSpace::Extension, "ampersand")
        .map(str::to_string);

    if let Some(body) = file.find_child("body") {
        doc.body = read_units(body, &doc)?;
    }
    debug!(
        "读取XLIFF: {} ({} 个翻译单元)",
        doc.original,
        doc.trans_units().len()
    );
    Ok(doc)
}

fn read_units(parent: &XmlElement, doc: &XliffDocument) -> Result<Vec<Unit>> {
    let mut units = Vec::new();
    for child in parent.child_elements() {
        match child.name.as_str() {
            "group" => units.push(Unit::Group(Group {
                restype: child.required("restype")?,
                attributes: child.html_attributes(),
                element: child
                    .attr(AttrSpace::Extension, "element")
                    .map(str::to_string),
                children: read_units(child, doc)?,
            })),
            "trans-unit" if child.flag(AttrSpace::Extension, "empty-group") => {
                units.push(Unit::Group(Group {
                    restype: child.required("restype")?,
                    attributes: child.html_attributes(),
                    element: child
                        .attr(AttrSpace::Extension, "element")
                        .map(str::to_string),
                    children: Vec::new(),
                }))
            }
            "trans-unit" => units.push(Unit::TransUnit(read_trans_unit(child, doc)?)),
            other => return Err(xliff_error!(schema, "element", other)),
        }
    }
    Ok(units)
}

fn read_trans_unit(element: &XmlElement, doc: &XliffDocument) -> Result<TransUnit> {
    let id = element.required("id")?;
    let source = element
        .find_child("source")
        .ok_or_else(|| xliff_error!(xliff_parse, format!("翻译单元 {} 缺少 <source>", id)))?;
    let source = Variant::new(
        source
            .attr(AttrSpace::Xml, "lang")
            .unwrap_or(&doc.source_language),
        read_inline(source)?,
    );

    let target = match element.find_child("target") {
        Some(target) => {
            let language = target
                .attr(AttrSpace::Xml, "lang")
                .map(str::to_string)
                .or_else(|| doc.target_language.clone())
                .ok_or_else(|| {
                    xliff_error!(xliff_parse, format!("翻译单元 {} 的译文缺少语言", id))
                })?;
            Some(Variant::new(&language, read_inline(target)?))
        }
        None => None,
    };

    let notes = element
        .child_elements()
        .filter(|child| child.name == "note")
        .map(|note| Note {
            from: note.plain("from").map(str::to_string),
            text: note.text_content(),
        })
        .collect();

    for child in element.child_elements() {
        if !matches!(child.name.as_str(), "source" | "target" | "note") {
            debug!("忽略翻译单元 {} 中的 <{}>", id, child.name);
        }
    }

    Ok(TransUnit {
        resname: element.plain("resname").map(str::to_string),
        restype: element.required("restype")?,
        attributes: element.html_attributes(),
        element: element
            .attr(AttrSpace::Extension, "element")
            .map(str::to_string),
        source,
        target,
        notes,
        dynamic: element.flag(AttrSpace::Extension, "dynamic"),
        approved: element.flag(AttrSpace::Plain, "approved"),
        translate: element.plain("translate") != Some("no"),
        id,
    })
}

fn read_inline(parent: &XmlElement) -> Result<Vec<Inline>> {
    let mut content = Vec::new();
    for child in &parent.children {
        match child {
            XmlContent::Text(text) => content.push(Inline::Text(text.clone())),
            XmlContent::Element(element) => content.push(read_inline_element(element)?),
        }
    }
    Ok(content)
}

fn read_inline_element(element: &XmlElement) -> Result<Inline> {
    match element.name.as_str() {
        "g" => Ok(Inline::Span(Span {
            id: element.required("id")?,
            ctype: element.required("ctype")?,
            lang: element.attr(AttrSpace::Xml, "lang").map(str::to_string),
            attributes: element.html_attributes(),
            content: read_inline(element)?,
        })),
        "x" => Ok(Inline::Marker(Marker {
            id: element.required("id")?,
            ctype: element.required("ctype")?,
            attributes: element.html_attributes(),
            equiv_text: element.plain("equiv-text").map(str::to_string),
        })),
        "ph" => {
            let mut content = Vec::new();
            let mut subs = Vec::new();
            for child in &element.children {
                match child {
                    XmlContent::Text(text) => content.push(Inline::Text(text.clone())),
                    XmlContent::Element(sub) if sub.name == "sub" => subs.push(SubFlow {
                        ctype: sub.required("ctype")?,
                        text: sub.text_content(),
                    }),
                    XmlContent::Element(other) => content.push(read_inline_element(other)?),
                }
            }
            Ok(Inline::Placeholder(Placeholder {
                id: element.required("id")?,
                ctype: element.plain("ctype").map(str::to_string),
                attributes: element.html_attributes(),
                content,
                subs,
            }))
        }
        other => Err(xliff_error!(schema, "inline element", other)),
    }
}

fn resolve_space(resolve: ResolveResult<'_>) -> AttrSpace {
    match resolve {
        ResolveResult::Unbound => AttrSpace::Plain,
        ResolveResult::Bound(ns) => match ns.as_ref() {
            ns if ns == HTML_ATTR_NAMESPACE.as_bytes() => AttrSpace::Html,
            ns if ns == EXTENSION_NAMESPACE.as_bytes() => AttrSpace::Extension,
            ns if ns == XML_NAMESPACE.as_bytes() => AttrSpace::Xml,
            _ => AttrSpace::Other,
        },
        ResolveResult::Unknown(prefix) => {
            debug!("未知的命名空间前缀: {}", String::from_utf8_lossy(&prefix));
            AttrSpace::Other
        }
    }
}

/// 把XML解析成一棵简单的元素树
fn parse_tree(input: &str) -> Result<XmlElement> {
    let mut reader = NsReader::from_str(input);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) => {
                let element = start_element(&reader, e)?;
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = start_element(&reader, e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xliff_error!(xliff_parse, "多余的结束标签"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|e| xliff_error!(xliff_parse, e))?;
                push_text(&mut stack, &text);
            }
            Event::CData(e) => {
                push_text(&mut stack, &String::from_utf8_lossy(&e));
            }
            Event::GeneralRef(e) => {
                let raw = e.decode().map_err(|e| xliff_error!(xliff_parse, e))?;
                let resolved = resolve_entity(&raw)?;
                push_text(&mut stack, &resolved);
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(xliff_error!(xliff_parse, "文档在元素闭合前结束"));
    }
    root.ok_or_else(|| xliff_error!(xliff_parse, "空文档"))
}

fn start_element(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> Result<XmlElement> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| xliff_error!(xliff_parse, e))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolve, local) = reader.resolve_attribute(attr.key);
        let space = resolve_space(resolve);
        let name = String::from_utf8_lossy(local.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xliff_error!(xliff_parse, e))?
            .into_owned();
        attrs.push((space, name, value));
    }
    Ok(XmlElement {
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        attrs,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlContent::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(xliff_error!(xliff_parse, "文档存在多个根元素")),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        match parent.children.last_mut() {
            Some(XmlContent::Text(existing)) => existing.push_str(text),
            _ => parent.children.push(XmlContent::Text(text.to_string())),
        }
    }
}

fn resolve_entity(raw: &str) -> Result<String> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.to_string());
    }

    if let Some(rest) = raw.strip_prefix('#') {
        let code = match rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => rest.parse::<u32>().ok(),
        };
        if let Some(ch) = code.and_then(char::from_u32) {
            return Ok(ch.to_string());
        }
    }

    Err(xliff_error!(xliff_parse, format!("无法解析的实体: &{};", raw)))
}
