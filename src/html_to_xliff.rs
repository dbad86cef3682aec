//! HTML → XLIFF 转换
//!
//! 单次深度优先遍历。元素按以下规则分类：
//! - 纯容器标签或含块级子元素的元素成为Group；
//! - 只含文本/内联内容且有可翻译文本的元素成为TransUnit；
//! - 原始文本元素（script、style等）的代码，以及 `pre`/`textarea` 中只有空白的内容，
//!   成为 `translate="no"` 的TransUnit，原样保存；
//! - 其余元素成为Group（子元素照常递归，没有子元素时为空Group）。
//!
//! Group中直接出现的内联文本段会成为 `x-text-run` 翻译单元，反向时原样拼回父元素。

// 第三方crate导入
use tracing::debug;

// 本地模块导入
use crate::config::ConversionConfig;
use crate::html_processor::{HtmlElement, HtmlNode};
use crate::restype::{
    self, ctype_for, is_container_tag, is_inline_tag, is_known_tag, is_opaque_tag,
    is_preformatted_tag, is_raw_text_tag, restype_for, sub_ctype_for, IdAllocator, CTYPE_IMAGE,
    CTYPE_LINE_BREAK, TEXT_RUN_RESTYPE,
};
use crate::xliff::{
    Group, HtmlAttributes, Inline, Marker, Placeholder, Span, SubFlow, TransUnit, Unit, Variant,
    XliffDocument,
};

/// 换行标记代表的空白
const LINE_BREAK_EQUIV: &str = "\n";

/// 把HTML树转换为XLIFF文档
pub fn html_to_xliff(root: &HtmlElement, config: &ConversionConfig) -> XliffDocument {
    let source_language = if root.tag == "html" {
        element_lang(root).unwrap_or_else(|| config.source_lang().to_string())
    } else {
        config.source_lang().to_string()
    };

    let mut doc = XliffDocument::new(config.original_name(), &source_language);
    doc.target_language = config.target_lang().map(str::to_string);
    doc.hard_linebreak = config.hard_linebreak_token().map(str::to_string);
    doc.ampersand = config.ampersand_token().map(str::to_string);

    let mut converter = HtmlToXliff {
        key_attribute: config.key_attr(),
        source_language: &source_language,
        ids: IdAllocator::new(),
    };
    let root_unit = converter.convert_root(root);
    doc.body.push(root_unit);

    debug!(
        "HTML→XLIFF: {} 个翻译单元, 合成id计数 {}",
        doc.trans_units().len(),
        converter.ids.generated_count()
    );
    doc
}

/// 一次转换调用的上下文
struct HtmlToXliff<'a> {
    key_attribute: &'a str,
    source_language: &'a str,
    ids: IdAllocator,
}

impl<'a> HtmlToXliff<'a> {
    fn convert_root(&mut self, root: &HtmlElement) -> Unit {
        if root.tag != "html" {
            return self.convert_element(root);
        }
        // 根元素的语言已经写进文件头
        let (restype, element) = restype_for(&root.tag);
        let attributes = self.copy_attributes(root, &["lang", "xml:lang"]);
        Unit::Group(Group {
            restype,
            attributes,
            element,
            children: self.convert_children(&root.children),
        })
    }

    fn convert_element(&mut self, element: &HtmlElement) -> Unit {
        let tag = element.tag.as_str();
        if !is_known_tag(tag) {
            debug!("词表外的标签 <{}>，按默认规则处理", tag);
        }

        if is_opaque_tag(tag) {
            if is_raw_text_tag(tag) && has_text(&element.children) {
                return Unit::TransUnit(self.verbatim_unit(element));
            }
            return Unit::Group(self.group(element, Vec::new()));
        }

        if is_container_tag(tag) || has_block_child(element) {
            let children = self.convert_children(&element.children);
            return Unit::Group(self.group(element, children));
        }

        if has_own_out_of_band(element) || has_translatable_content(&element.children) {
            return Unit::TransUnit(self.trans_unit(element));
        }

        if is_preformatted_tag(tag) && has_text(&element.children) {
            return Unit::TransUnit(self.verbatim_unit(element));
        }

        let children = self.convert_children(&element.children);
        Unit::Group(self.group(element, children))
    }

    fn group(&self, element: &HtmlElement, children: Vec<Unit>) -> Group {
        let (restype, shared) = restype_for(&element.tag);
        Group {
            restype,
            attributes: self.copy_attributes(element, &[]),
            element: shared,
            children,
        }
    }

    fn translation_key<'e>(&self, element: &'e HtmlElement) -> Option<&'e str> {
        element
            .get_attr(self.key_attribute)
            .filter(|key| !key.trim().is_empty())
    }

    /// 原样保存、不参与翻译的单元；`lang` 等属性照常复制
    fn verbatim_unit(&mut self, element: &HtmlElement) -> TransUnit {
        let (restype, shared) = restype_for(&element.tag);
        let key = self.translation_key(element);
        let id = self.ids.unit_id(key);
        let excluded: Vec<&str> = key.map(|_| self.key_attribute).into_iter().collect();
        let attributes = self.copy_attributes(element, &excluded);

        let content = if is_raw_text_tag(&element.tag) {
            vec![Inline::Text(element.text_content())]
        } else {
            self.walk_inline(&element.children)
        };
        debug!("<{}> 原样保存为 {}", element.tag, id);

        TransUnit {
            resname: key.map(str::to_string),
            restype,
            attributes,
            element: shared,
            translate: false,
            ..TransUnit::new(&id, "", Variant::new(self.source_language, content))
        }
    }

    /// Group的子节点：块级元素逐个转换，连续的内联节点合并为一段
    fn convert_children(&mut self, children: &[HtmlNode]) -> Vec<Unit> {
        let mut units = Vec::new();
        let mut run: Vec<&HtmlNode> = Vec::new();

        for child in children {
            match child {
                HtmlNode::Element(element) if !is_inline_tag(&element.tag) => {
                    self.flush_run(&mut run, &mut units);
                    units.push(self.convert_element(element));
                }
                _ => run.push(child),
            }
        }
        self.flush_run(&mut run, &mut units);
        units
    }

    fn flush_run(&mut self, run: &mut Vec<&HtmlNode>, units: &mut Vec<Unit>) {
        if run.is_empty() {
            return;
        }
        let nodes: Vec<HtmlNode> = run.drain(..).cloned().collect();

        if has_translatable_content(&nodes) {
            let id = self.ids.unit_id(None);
            let content = self.walk_inline(&nodes);
            let unit = TransUnit::new(
                &id,
                TEXT_RUN_RESTYPE,
                Variant::new(self.source_language, content),
            );
            units.push(Unit::TransUnit(unit));
            return;
        }

        // 没有文本的内联节点（例如块之间的 <br>）各自成为空Group
        for node in &nodes {
            if let HtmlNode::Element(element) = node {
                let children = self.convert_children(&element.children);
                units.push(Unit::Group(self.group(element, children)));
            }
        }
    }

    fn trans_unit(&mut self, element: &HtmlElement) -> TransUnit {
        let (restype, shared) = restype_for(&element.tag);
        let key = self.translation_key(element);
        let id = self.ids.unit_id(key);
        let language = element_lang(element).unwrap_or_else(|| self.source_language.to_string());

        let out_of_band = out_of_band_attributes(element);
        let mut excluded: Vec<&str> = vec!["lang", "xml:lang"];
        if key.is_some() {
            excluded.push(self.key_attribute);
        }
        excluded.extend(out_of_band.iter().map(|(name, _)| *name));
        let attributes = self.copy_attributes(element, &excluded);

        let mut content = Vec::new();
        if !out_of_band.is_empty() {
            content.push(self.attribute_carrier(&element.tag, &out_of_band));
        }
        content.extend(self.walk_inline(&element.children));
        assert!(
            !content.is_empty(),
            "翻译单元 {} 没有任何原文内容",
            id
        );

        TransUnit {
            resname: key.map(str::to_string),
            restype,
            attributes,
            element: shared,
            ..TransUnit::new(&id, "", Variant::new(&language, content))
        }
    }

    /// 不带ctype的占位符：子流属于外层元素
    fn attribute_carrier(&mut self, tag: &str, out_of_band: &[(&str, &str)]) -> Inline {
        Inline::Placeholder(Placeholder {
            id: self.ids.marker_id(),
            ctype: None,
            attributes: HtmlAttributes::new(),
            content: Vec::new(),
            subs: sub_flows(tag, out_of_band),
        })
    }

    fn walk_inline(&mut self, nodes: &[HtmlNode]) -> Vec<Inline> {
        let mut content: Vec<Inline> = Vec::new();
        for node in nodes {
            match node {
                HtmlNode::Text(text) => push_text(&mut content, text),
                HtmlNode::Element(element) => {
                    let inline = self.inline_element(element);
                    content.push(inline);
                }
            }
        }
        content
    }

    fn inline_element(&mut self, element: &HtmlElement) -> Inline {
        let out_of_band = out_of_band_attributes(element);
        let oob_names: Vec<&str> = out_of_band.iter().map(|(name, _)| *name).collect();

        match element.tag.as_str() {
            "br" => Inline::Marker(Marker {
                id: self.ids.marker_id(),
                ctype: CTYPE_LINE_BREAK.to_string(),
                attributes: self.copy_attributes(element, &[]),
                equiv_text: Some(LINE_BREAK_EQUIV.to_string()),
            }),
            "img" if !out_of_band.is_empty() => Inline::Placeholder(Placeholder {
                id: self.ids.marker_id(),
                ctype: Some(CTYPE_IMAGE.to_string()),
                attributes: self.copy_attributes(element, &oob_names),
                content: Vec::new(),
                subs: sub_flows(&element.tag, &out_of_band),
            }),
            "img" => Inline::Marker(Marker {
                id: self.ids.marker_id(),
                ctype: CTYPE_IMAGE.to_string(),
                attributes: self.copy_attributes(element, &[]),
                equiv_text: None,
            }),
            // 内联位置的代码作为 ph 的原生内容
            tag if is_raw_text_tag(tag) && has_text(&element.children) => {
                Inline::Placeholder(Placeholder {
                    id: self.ids.marker_id(),
                    ctype: Some(ctype_for(tag)),
                    attributes: self.copy_attributes(element, &[]),
                    content: vec![Inline::Text(element.text_content())],
                    subs: Vec::new(),
                })
            }
            tag if is_opaque_tag(tag) => {
                debug!("内联位置的 <{}> 只保留属性", tag);
                Inline::Marker(Marker {
                    id: self.ids.marker_id(),
                    ctype: ctype_for(tag),
                    attributes: self.copy_attributes(element, &[]),
                    equiv_text: None,
                })
            }
            tag => {
                let id = self.ids.marker_id();
                let mut excluded = vec!["lang", "xml:lang"];
                excluded.extend(oob_names.iter().copied());
                let attributes = self.copy_attributes(element, &excluded);

                let mut content = Vec::new();
                if !out_of_band.is_empty() {
                    content.push(self.attribute_carrier(tag, &out_of_band));
                }
                content.extend(self.walk_inline(&element.children));

                Inline::Span(Span {
                    id,
                    ctype: ctype_for(tag),
                    lang: element_lang(element),
                    attributes,
                    content,
                })
            }
        }
    }

    /// 复制属性，`excluded` 中的属性已由一等字段表达
    fn copy_attributes(&self, element: &HtmlElement, excluded: &[&str]) -> HtmlAttributes {
        element
            .attrs
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .filter(|(name, _)| !excluded.contains(&name.as_str()))
            .collect()
    }
}

fn element_lang(element: &HtmlElement) -> Option<String> {
    element
        .get_attr("lang")
        .or_else(|| element.get_attr("xml:lang"))
        .filter(|lang| !lang.trim().is_empty())
        .map(str::to_string)
}

/// 非空的带外属性：任意元素的title，图片的alt
fn out_of_band_attributes(element: &HtmlElement) -> Vec<(&'static str, &str)> {
    restype::OUT_OF_BAND_ATTRIBUTES
        .iter()
        .filter(|name| **name != "alt" || element.tag == "img")
        .filter_map(|name| {
            element
                .get_attr(name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*name, value))
        })
        .collect()
}

fn has_own_out_of_band(element: &HtmlElement) -> bool {
    !is_opaque_tag(&element.tag) && !out_of_band_attributes(element).is_empty()
}

fn sub_flows(tag: &str, out_of_band: &[(&str, &str)]) -> Vec<SubFlow> {
    out_of_band
        .iter()
        .map(|(name, value)| SubFlow {
            ctype: sub_ctype_for(tag, name),
            text: value.to_string(),
        })
        .collect()
}

/// 是否有块级（非内联、非不透明）子元素
fn has_block_child(element: &HtmlElement) -> bool {
    element.children.iter().any(|child| match child {
        HtmlNode::Element(child) => !is_inline_tag(&child.tag) && !is_opaque_tag(&child.tag),
        HtmlNode::Text(_) => false,
    })
}

/// 是否有任何文本，包括只有空白的文本
fn has_text(nodes: &[HtmlNode]) -> bool {
    nodes.iter().any(|node| match node {
        HtmlNode::Text(text) => !text.is_empty(),
        HtmlNode::Element(element) => has_text(&element.children),
    })
}

/// 内联上下文中是否有可翻译的内容
fn has_translatable_content(nodes: &[HtmlNode]) -> bool {
    nodes.iter().any(|node| match node {
        HtmlNode::Text(text) => !text.trim().is_empty(),
        HtmlNode::Element(element) => {
            has_own_out_of_band(element)
                || (!is_opaque_tag(&element.tag) && has_translatable_content(&element.children))
        }
    })
}

fn push_text(content: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    match content.last_mut() {
        Some(Inline::Text(existing)) => existing.push_str(text),
        _ => content.push(Inline::Text(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(root: &HtmlElement) -> XliffDocument {
        html_to_xliff(root, &ConversionConfig::new().original("test.html"))
    }

    fn body_units(doc: &XliffDocument) -> &[Unit] {
        match &doc.body[0] {
            Unit::Group(html) => match html.children.last() {
                Some(Unit::Group(body)) => &body.children,
                other => panic!("expected body group, got {:?}", other),
            },
            other => panic!("expected html group, got {:?}", other),
        }
    }

    fn page(body: HtmlElement) -> HtmlElement {
        HtmlElement::new("html")
            .attr("lang", "en")
            .child(HtmlElement::new("head"))
            .child(body)
    }

    fn as_trans_unit(unit: &Unit) -> &TransUnit {
        match unit {
            Unit::TransUnit(unit) => unit,
            other => panic!("expected trans-unit, got {:?}", other),
        }
    }

    #[test]
    fn test_table_structure() {
        let table = HtmlElement::new("table").child(
            HtmlElement::new("tr")
                .child(HtmlElement::new("td").text("A"))
                .child(HtmlElement::new("td").text("B")),
        );
        let doc = convert(&table);

        let table = match &doc.body[0] {
            Unit::Group(group) => group,
            other => panic!("expected group, got {:?}", other),
        };
        assert_eq!(table.restype, "table");
        assert_eq!(table.children.len(), 1);
        let row = match &table.children[0] {
            Unit::Group(group) => group,
            other => panic!("expected group, got {:?}", other),
        };
        assert_eq!(row.restype, "row");

        let cells: Vec<&TransUnit> = row.children.iter().map(as_trans_unit).collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].restype, "cell");
        assert_eq!(cells[0].id, "genid-1");
        assert_eq!(cells[0].source_text(), "A");
        assert_eq!(cells[1].id, "genid-2");
        assert_eq!(cells[1].source_text(), "B");
    }

    #[test]
    fn test_inline_span_with_language() {
        let body = HtmlElement::new("body").child(
            HtmlElement::new("p")
                .text("The words ")
                .child(HtmlElement::new("q").attr("lang", "fr").text("Je me souviens"))
                .text(" are the motto."),
        );
        let doc = convert(&page(body));
        assert_eq!(doc.source_language, "en");

        let unit = as_trans_unit(&body_units(&doc)[0]);
        assert_eq!(unit.restype, "x-html-p");
        assert_eq!(
            unit.source.content,
            vec![
                Inline::Text("The words ".to_string()),
                Inline::Span(Span {
                    id: "genid-2".to_string(),
                    ctype: "x-html-q".to_string(),
                    lang: Some("fr".to_string()),
                    attributes: HtmlAttributes::new(),
                    content: vec![Inline::Text("Je me souviens".to_string())],
                }),
                Inline::Text(" are the motto.".to_string()),
            ]
        );
    }

    #[test]
    fn test_title_and_alt_placeholders() {
        let body = HtmlElement::new("body").child(
            HtmlElement::new("p")
                .attr("title", "T")
                .text("Body ")
                .child(HtmlElement::new("img").attr("src", "i.jpg").attr("alt", "A")),
        );
        let doc = convert(&page(body));
        let unit = as_trans_unit(&body_units(&doc)[0]);
        assert!(unit.attributes.is_empty());

        let content = &unit.source.content;
        assert_eq!(content.len(), 3);
        match &content[0] {
            Inline::Placeholder(ph) => {
                assert_eq!(ph.ctype, None);
                assert_eq!(ph.subs.len(), 1);
                assert!(ph.subs[0].ctype.ends_with("-title"));
                assert_eq!(ph.subs[0].text, "T");
            }
            other => panic!("expected placeholder, got {:?}", other),
        }
        assert_eq!(content[1], Inline::Text("Body ".to_string()));
        match &content[2] {
            Inline::Placeholder(ph) => {
                assert_eq!(ph.ctype.as_deref(), Some("image"));
                assert_eq!(ph.attributes.get("src").map(String::as_str), Some("i.jpg"));
                assert!(!ph.attributes.contains_key("alt"));
                assert_eq!(ph.subs[0].ctype, "x-html-img-alt");
                assert_eq!(ph.subs[0].text, "A");
            }
            other => panic!("expected placeholder, got {:?}", other),
        }
        assert_eq!(unit.id, "genid-1");
    }

    #[test]
    fn test_translation_key_disambiguation() {
        let body = HtmlElement::new("body")
            .child(HtmlElement::new("p").attr("data-l10n-id", "K").text("one"))
            .child(HtmlElement::new("p").attr("data-l10n-id", "K").text("two"))
            .child(HtmlElement::new("p").attr("data-l10n-id", "K").text("three"))
            .child(HtmlElement::new("p").text("four"));
        let doc = convert(&page(body));
        let ids: Vec<&str> = doc.trans_units().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["K", "K-1", "K-2", "genid-1"]);

        let first = doc.find("K-1").unwrap();
        assert_eq!(first.resname.as_deref(), Some("K"));
        assert!(!first.attributes.contains_key("data-l10n-id"));
    }

    #[test]
    fn test_line_break_and_empty_elements() {
        let body = HtmlElement::new("body")
            .child(HtmlElement::new("p").text("one").child(HtmlElement::new("br")).text("two"))
            .child(HtmlElement::new("br"))
            .child(HtmlElement::new("script").attr("src", "a.js"))
            .child(HtmlElement::new("p").attr("class", "empty"));
        let doc = convert(&page(body));
        let units = body_units(&doc);
        assert_eq!(units.len(), 4);

        let first = as_trans_unit(&units[0]);
        match &first.source.content[1] {
            Inline::Marker(marker) => {
                assert_eq!(marker.ctype, "lb");
                assert_eq!(marker.equiv_text.as_deref(), Some("\n"));
            }
            other => panic!("expected marker, got {:?}", other),
        }
        for (unit, restype) in units[1..].iter().zip(["x-html-br", "x-html-script", "x-html-p"]) {
            match unit {
                Unit::Group(group) => {
                    assert_eq!(group.restype, restype);
                    assert!(group.children.is_empty());
                }
                other => panic!("expected group, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_code_is_kept_verbatim() {
        let body = HtmlElement::new("body")
            .child(HtmlElement::new("style").text("p { color: red }"))
            .child(
                HtmlElement::new("p")
                    .text("Hi ")
                    .child(HtmlElement::new("script").attr("type", "module").text("go();")),
            )
            .child(HtmlElement::new("pre").attr("lang", "fr").text("  "));
        let doc = convert(&page(body));
        let units = body_units(&doc);
        assert_eq!(units.len(), 3);

        let style = as_trans_unit(&units[0]);
        assert_eq!(style.id, "genid-1");
        assert_eq!(style.restype, "x-html-style");
        assert!(!style.translate);
        assert_eq!(style.source.content, vec![Inline::Text("p { color: red }".to_string())]);

        let p = as_trans_unit(&units[1]);
        assert!(p.translate);
        assert_eq!(p.source_text(), "Hi ");
        match &p.source.content[1] {
            Inline::Placeholder(ph) => {
                assert_eq!(ph.ctype.as_deref(), Some("x-html-script"));
                assert_eq!(ph.attributes.get("type").map(String::as_str), Some("module"));
                assert_eq!(ph.content, vec![Inline::Text("go();".to_string())]);
            }
            other => panic!("expected placeholder, got {:?}", other),
        }

        let pre = as_trans_unit(&units[2]);
        assert!(!pre.translate);
        assert_eq!(pre.source.content, vec![Inline::Text("  ".to_string())]);
        assert_eq!(pre.source.language, "en");
        assert_eq!(pre.attributes.get("lang").map(String::as_str), Some("fr"));
    }

    #[test]
    fn test_form_controls_become_units() {
        let body = HtmlElement::new("body").child(
            HtmlElement::new("form")
                .child(
                    HtmlElement::new("select")
                        .attr("name", "c")
                        .child(HtmlElement::new("option").attr("value", "r").text("Red")),
                )
                .child(HtmlElement::new("textarea").text("Type here"))
                .child(HtmlElement::new("button").text("Send")),
        );
        let doc = convert(&page(body));
        let texts: Vec<(String, String)> = doc
            .trans_units()
            .iter()
            .map(|u| (u.restype.clone(), u.source_text()))
            .collect();
        assert_eq!(
            texts,
            vec![
                ("x-html-option".to_string(), "Red".to_string()),
                ("x-html-textarea".to_string(), "Type here".to_string()),
                ("x-html-button".to_string(), "Send".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_names_and_group_language_are_kept() {
        let body = HtmlElement::new("body")
            .child(
                HtmlElement::new("div")
                    .attr("xml:lang", "de")
                    .attr("@click", "open")
                    .child(HtmlElement::new("p").attr("v-on:click", "go").text("x")),
            )
            .child(HtmlElement::new("p").attr("data-l10n-id", " ").text("y"));
        let doc = convert(&page(body));

        let div = match &body_units(&doc)[0] {
            Unit::Group(group) => group,
            other => panic!("expected group, got {:?}", other),
        };
        assert_eq!(div.attributes.get("xml:lang").map(String::as_str), Some("de"));
        assert_eq!(div.attributes.get("@click").map(String::as_str), Some("open"));
        let p = as_trans_unit(&div.children[0]);
        assert_eq!(p.attributes.get("v-on:click").map(String::as_str), Some("go"));

        // 空白的翻译键不作为id，属性照常保留
        let blank = as_trans_unit(&body_units(&doc)[1]);
        assert_eq!(blank.resname, None);
        assert_eq!(blank.attributes.get("data-l10n-id").map(String::as_str), Some(" "));
    }

    #[test]
    fn test_custom_element_uses_default_restype() {
        let body = HtmlElement::new("body")
            .child(HtmlElement::new("my-widget").text("Hello"))
            .child(HtmlElement::new("datalist").attr("id", "d"));
        let doc = convert(&page(body));
        let units = body_units(&doc);
        assert_eq!(units[0].restype(), "x-html-my-widget");
        assert_eq!(as_trans_unit(&units[0]).source_text(), "Hello");
        assert_eq!(units[1].restype(), "x-html-datalist");
    }

    #[test]
    fn test_text_run_inside_group() {
        let body = HtmlElement::new("body")
            .text("Intro ")
            .child(HtmlElement::new("b").text("bold"))
            .child(HtmlElement::new("p").text("para"));
        let doc = convert(&page(body));
        let units = body_units(&doc);
        let run = as_trans_unit(&units[0]);
        assert_eq!(run.restype, TEXT_RUN_RESTYPE);
        assert_eq!(run.source_text(), "Intro bold");
        match &run.source.content[1] {
            Inline::Span(span) => assert_eq!(span.ctype, "bold"),
            other => panic!("expected span, got {:?}", other),
        }
        assert_eq!(as_trans_unit(&units[1]).restype, "x-html-p");
    }

    #[test]
    fn test_attributes_copied_and_head_restype() {
        let root = HtmlElement::new("html")
            .attr("lang", "de")
            .child(HtmlElement::new("head").child(HtmlElement::new("title").text("Titel")))
            .child(
                HtmlElement::new("body").child(
                    HtmlElement::new("div")
                        .attr("Class", "box")
                        .attr("title", "kept")
                        .child(HtmlElement::new("p").attr("lang", "fr").text("Bonjour")),
                ),
            );
        let doc = convert(&root);
        assert_eq!(doc.source_language, "de");

        let html = match &doc.body[0] {
            Unit::Group(group) => group,
            other => panic!("expected group, got {:?}", other),
        };
        assert_eq!(html.restype, "x-html-html");
        assert!(html.attributes.is_empty());
        assert_eq!(html.children[0].restype(), "header");

        let div = match &body_units(&doc)[0] {
            Unit::Group(group) => group,
            other => panic!("expected group, got {:?}", other),
        };
        assert_eq!(div.attributes.get("class").map(String::as_str), Some("box"));
        assert_eq!(div.attributes.get("title").map(String::as_str), Some("kept"));

        let p = as_trans_unit(&div.children[0]);
        assert_eq!(p.source.language, "fr");
        assert!(p.attributes.is_empty());
    }
}
