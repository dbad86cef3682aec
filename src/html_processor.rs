//! HTML处理模块
//!
//! 提供HTML树模型、html5ever解析以及经由rcdom的序列化。
//! 注释、处理指令和DOCTYPE在解析时直接丢弃。
//!
//! 解析与序列化都关闭脚本支持，`noscript` 的内容因此是普通的节点树；
//! `template` 的内容片段作为它的子节点。

// 第三方crate导入
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{create_element, NodeOrText, TreeBuilderOpts, TreeSink};
use html5ever::{parse_document, Attribute, LocalName, Namespace, ParseOpts, Prefix, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use tracing::debug;

// 本地模块导入
use crate::error::Result;
use crate::xliff::HtmlAttributes;
use crate::xliff_error;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// HTML树节点：元素或文本叶子
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
}

/// HTML元素，标签与属性名均为小写
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HtmlElement {
    pub tag: String,
    pub attrs: HtmlAttributes,
    pub children: Vec<HtmlNode>,
}

impl HtmlElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: HtmlAttributes::new(),
            children: Vec::new(),
        }
    }

    /// 设置属性（链式）
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// 追加子元素（链式）
    pub fn child(mut self, child: HtmlElement) -> Self {
        self.children.push(HtmlNode::Element(child));
        self
    }

    /// 追加文本（链式）
    pub fn text(mut self, text: &str) -> Self {
        self.children.push(HtmlNode::Text(text.to_string()));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// 展平后的文本内容
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

impl From<HtmlElement> for HtmlNode {
    fn from(element: HtmlElement) -> Self {
        HtmlNode::Element(element)
    }
}

fn collect_text(children: &[HtmlNode], out: &mut String) {
    for child in children {
        match child {
            HtmlNode::Text(text) => out.push_str(text),
            HtmlNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// 解析HTML字符串，返回根 `html` 元素
pub fn parse_html(html: &str) -> Result<HtmlElement> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| xliff_error!(html_parse, e))?;

    if !dom.errors.borrow().is_empty() {
        debug!("HTML解析时修正了 {} 处问题", dom.errors.borrow().len());
    }

    let root = dom
        .document
        .children
        .borrow()
        .iter()
        .find_map(|child| match convert_handle(child) {
            Some(HtmlNode::Element(element)) if element.tag == "html" => Some(element),
            _ => None,
        });

    root.ok_or_else(|| xliff_error!(html_parse, "文档中没有html根元素"))
}

fn convert_handle(handle: &Handle) -> Option<HtmlNode> {
    match handle.data {
        NodeData::Text { ref contents } => Some(HtmlNode::Text(contents.borrow().to_string())),
        NodeData::Element {
            ref name,
            ref attrs,
            ref template_contents,
            ..
        } => {
            let mut element = HtmlElement::new(name.local.as_ref());
            for attr in attrs.borrow().iter() {
                let key = match attr.name.prefix {
                    Some(ref prefix) => format!("{}:{}", prefix.as_ref(), attr.name.local.as_ref()),
                    None => attr.name.local.to_string(),
                };
                element
                    .attrs
                    .insert(key.to_ascii_lowercase(), attr.value.to_string());
            }
            element.children = match template_contents.borrow().as_ref() {
                Some(contents) => convert_children(contents),
                None => convert_children(handle),
            };
            Some(HtmlNode::Element(element))
        }
        // 注释、DOCTYPE、处理指令不保留
        _ => None,
    }
}

fn convert_children(handle: &Handle) -> Vec<HtmlNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_handle)
        .collect()
}

/// 序列化HTML树为字符串
pub fn serialize_html(root: &HtmlElement) -> Result<String> {
    let dom = RcDom::default();
    let node = build_element(&dom, root);
    dom.append(&dom.document, NodeOrText::AppendNode(node));

    let mut buffer = Vec::new();
    serialize(
        &mut buffer,
        &SerializableHandle::from(dom.document.clone()),
        SerializeOpts {
            scripting_enabled: false,
            ..Default::default()
        },
    )
    .map_err(|e| xliff_error!(html_parse, format!("HTML序列化失败: {}", e)))?;

    String::from_utf8(buffer)
        .map_err(|e| xliff_error!(html_parse, format!("UTF-8转换失败: {}", e)))
}

fn build_element(dom: &RcDom, element: &HtmlElement) -> Handle {
    let attrs = element
        .attrs
        .iter()
        .map(|(key, value)| Attribute {
            name: attribute_name(key),
            value: StrTendril::from_slice(value),
        })
        .collect();
    let handle = create_element(
        dom,
        QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(element.tag.as_str()),
        ),
        attrs,
    );

    for child in &element.children {
        match child {
            HtmlNode::Text(text) => {
                dom.append(&handle, NodeOrText::AppendText(StrTendril::from_slice(text)))
            }
            HtmlNode::Element(child) => {
                let child_handle = build_element(dom, child);
                dom.append(&handle, NodeOrText::AppendNode(child_handle));
            }
        }
    }
    handle
}

fn attribute_name(key: &str) -> QualName {
    match key.strip_prefix("xml:") {
        Some(local) => QualName::new(
            Some(Prefix::from("xml")),
            Namespace::from(XML_NAMESPACE),
            LocalName::from(local),
        ),
        None => QualName::new(None, Namespace::from(""), LocalName::from(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drops_comments() {
        let root = parse_html(
            "<!DOCTYPE html><html lang=\"en\"><body><!-- x --><P CLASS=\"a\">Hi</P></body></html>",
        )
        .unwrap();
        assert_eq!(root.tag, "html");
        assert_eq!(root.get_attr("lang"), Some("en"));

        let body = root
            .children
            .iter()
            .find_map(|c| match c {
                HtmlNode::Element(e) if e.tag == "body" => Some(e),
                _ => None,
            })
            .unwrap();
        assert_eq!(body.children.len(), 1);
        match &body.children[0] {
            HtmlNode::Element(p) => {
                assert_eq!(p.tag, "p");
                assert_eq!(p.get_attr("class"), Some("a"));
                assert_eq!(p.text_content(), "Hi");
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn test_serialize_escapes_text_and_void_elements() {
        let root = HtmlElement::new("html").child(
            HtmlElement::new("body").child(
                HtmlElement::new("p")
                    .attr("title", "Null Front & Back Matter")
                    .text("a < b")
                    .child(HtmlElement::new("br")),
            ),
        );
        let html = serialize_html(&root).unwrap();
        assert!(html.contains("title=\"Null Front &amp; Back Matter\""));
        assert!(html.contains("a &lt; b<br>"));
        assert!(!html.contains("</br>"));
    }

    #[test]
    fn test_serialize_xml_lang() {
        let root = HtmlElement::new("html")
            .attr("lang", "fr")
            .attr("xml:lang", "fr");
        let html = serialize_html(&root).unwrap();
        assert!(html.contains("lang=\"fr\""));
        assert!(html.contains("xml:lang=\"fr\""));
    }

    #[test]
    fn test_template_and_noscript_content() {
        let source = "<html><head></head><body>\
            <template id=\"row\"><p>Hello</p></template>\
            <noscript><p>Enable &amp; reload</p></noscript>\
            <script>if (a < b) {}</script></body></html>";
        let root = parse_html(source).unwrap();
        assert!(root.text_content().contains("Hello"));
        assert!(root.text_content().contains("Enable & reload"));
        assert_eq!(serialize_html(&root).unwrap(), source);
    }

    #[test]
    fn test_parse_then_serialize_keeps_structure() {
        let source = "<html><head></head><body><p>The <q lang=\"fr\">Je</q> end.</p></body></html>";
        let root = parse_html(source).unwrap();
        assert_eq!(serialize_html(&root).unwrap(), source);
    }
}
