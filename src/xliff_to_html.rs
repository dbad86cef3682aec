//! XLIFF → HTML 转换
//!
//! [`crate::html_to_xliff`] 的结构逆变换。restype/ctype通过 [`crate::restype`] 的同一张表反查，
//! 表外的值一律返回 [`XliffError::UnexpectedSchema`](crate::error::XliffError)。
//!
//! 单元语言与根元素语言不同时输出 `lang`：独立元素写在元素上，拼回父元素的文本段
//! 包在 `span` 中。`translate="no"` 的单元原样输出。

// 第三方crate导入
use tracing::{debug, warn};

// 本地模块导入
use crate::config::ConversionConfig;
use crate::error::Result;
use crate::html_processor::{HtmlElement, HtmlNode};
use crate::restype::{parse_sub_ctype, tag_for_ctype, tag_for_restype, TEXT_RUN_RESTYPE};
use crate::xliff::{
    Group, HtmlAttributes, Inline, Placeholder, Span, SubFlow, TransUnit, Unit, XliffDocument,
};

/// 把XLIFF文档渲染为HTML树
///
/// 有译文的单元使用译文，否则使用原文。根元素的 `lang` 与 `xml:lang`
/// 取文件的目标语言，没有目标语言时取源语言。
pub fn xliff_to_html(doc: &XliffDocument, config: &ConversionConfig) -> Result<HtmlElement> {
    let document_language = doc
        .target_language
        .as_deref()
        .unwrap_or(&doc.source_language);

    let renderer = XliffToHtml {
        key_attribute: config.key_attr(),
        document_language,
    };

    let mut stray = HtmlAttributes::new();
    let nodes = renderer.render_units(&doc.body, &mut stray)?;
    if !stray.is_empty() {
        warn!("body顶层的文本段带有元素属性，已忽略: {:?}", stray.keys());
    }

    let mut root = match <[HtmlNode; 1]>::try_from(nodes) {
        Ok([HtmlNode::Element(element)]) => element,
        Ok(single) => wrap_in_html(Vec::from(single)),
        Err(nodes) => wrap_in_html(nodes),
    };
    root.attrs
        .insert("lang".to_string(), document_language.to_string());
    root.attrs
        .insert("xml:lang".to_string(), document_language.to_string());

    debug!("XLIFF→HTML: 根元素 <{}>", root.tag);
    Ok(root)
}

fn wrap_in_html(children: Vec<HtmlNode>) -> HtmlElement {
    HtmlElement {
        children,
        ..HtmlElement::new("html")
    }
}

struct XliffToHtml<'a> {
    key_attribute: &'a str,
    /// 根元素声明的语言
    document_language: &'a str,
}

impl<'a> XliffToHtml<'a> {
    /// 渲染一组单元。文本段直接拼入父元素，它携带的属性写入 `parent_attrs`
    fn render_units(&self, units: &[Unit], parent_attrs: &mut HtmlAttributes) -> Result<Vec<HtmlNode>> {
        let mut nodes = Vec::new();
        for unit in units {
            match unit {
                Unit::Group(group) => nodes.push(HtmlNode::Element(self.render_group(group)?)),
                Unit::TransUnit(unit) if unit.restype == TEXT_RUN_RESTYPE => {
                    let variant = unit.effective_variant();
                    let inline = self.render_inline(&variant.content, parent_attrs)?;
                    if unit.translate && variant.language != self.document_language {
                        let mut span = HtmlElement::new("span");
                        span.attrs
                            .insert("lang".to_string(), variant.language.clone());
                        span.children = inline;
                        nodes.push(HtmlNode::Element(span));
                    } else {
                        nodes.extend(inline);
                    }
                }
                Unit::TransUnit(unit) => {
                    nodes.push(HtmlNode::Element(self.render_trans_unit(unit)?))
                }
            }
        }
        Ok(nodes)
    }

    fn render_group(&self, group: &Group) -> Result<HtmlElement> {
        let tag = tag_for_restype(&group.restype, group.element.as_deref())?;
        let mut element = HtmlElement::new(&tag);
        element.attrs = group.attributes.clone();
        element.children = self.render_units(&group.children, &mut element.attrs)?;
        Ok(element)
    }

    fn render_trans_unit(&self, unit: &TransUnit) -> Result<HtmlElement> {
        let tag = tag_for_restype(&unit.restype, unit.element.as_deref())?;
        let variant = unit.effective_variant();

        let mut element = HtmlElement::new(&tag);
        element.attrs = unit.attributes.clone();
        if let Some(key) = &unit.resname {
            element
                .attrs
                .insert(self.key_attribute.to_string(), key.clone());
        }
        if unit.translate && variant.language != self.document_language {
            element
                .attrs
                .insert("lang".to_string(), variant.language.clone());
        }
        element.children = self.render_inline(&variant.content, &mut element.attrs)?;
        Ok(element)
    }

    /// 渲染内联内容；不带ctype的占位符把子流写入 `container_attrs`
    fn render_inline(
        &self,
        content: &[Inline],
        container_attrs: &mut HtmlAttributes,
    ) -> Result<Vec<HtmlNode>> {
        let mut nodes = Vec::with_capacity(content.len());
        for inline in content {
            match inline {
                Inline::Text(text) => nodes.push(HtmlNode::Text(text.clone())),
                Inline::Span(span) => nodes.push(HtmlNode::Element(self.render_span(span)?)),
                Inline::Marker(marker) => {
                    let mut element = HtmlElement::new(&tag_for_ctype(&marker.ctype)?);
                    element.attrs = marker.attributes.clone();
                    nodes.push(HtmlNode::Element(element));
                }
                Inline::Placeholder(placeholder) => match &placeholder.ctype {
                    Some(ctype) => {
                        let element = self.render_placeholder(ctype, placeholder)?;
                        nodes.push(HtmlNode::Element(element));
                    }
                    None => {
                        apply_sub_flows(&placeholder.subs, container_attrs)?;
                        nodes.extend(self.render_inline(&placeholder.content, container_attrs)?);
                    }
                },
            }
        }
        Ok(nodes)
    }

    fn render_span(&self, span: &Span) -> Result<HtmlElement> {
        let mut element = HtmlElement::new(&tag_for_ctype(&span.ctype)?);
        element.attrs = span.attributes.clone();
        if let Some(lang) = &span.lang {
            element.attrs.insert("lang".to_string(), lang.clone());
        }
        element.children = self.render_inline(&span.content, &mut element.attrs)?;
        Ok(element)
    }

    fn render_placeholder(&self, ctype: &str, placeholder: &Placeholder) -> Result<HtmlElement> {
        let mut element = HtmlElement::new(&tag_for_ctype(ctype)?);
        element.attrs = placeholder.attributes.clone();
        apply_sub_flows(&placeholder.subs, &mut element.attrs)?;
        element.children = self.render_inline(&placeholder.content, &mut element.attrs)?;
        Ok(element)
    }
}

/// 子流的ctype决定它写回哪个属性
fn apply_sub_flows(subs: &[SubFlow], attrs: &mut HtmlAttributes) -> Result<()> {
    for sub in subs {
        let (_, attribute) = parse_sub_ctype(&sub.ctype)?;
        attrs.insert(attribute, sub.text.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html_processor::{parse_html, serialize_html};
    use crate::html_to_xliff::html_to_xliff;
    use crate::xliff::{Marker, Variant};
    use crate::xliff_io::{read_xliff, write_xliff};

    fn round_trip(html: &str) -> String {
        let config = ConversionConfig::new();
        let root = parse_html(html).unwrap();
        let doc = html_to_xliff(&root, &config);
        let doc = read_xliff(&write_xliff(&doc).unwrap()).unwrap();
        let rendered = xliff_to_html(&doc, &config).unwrap();
        serialize_html(&rendered).unwrap()
    }

    #[test]
    fn test_round_trip_inline_language() {
        let html = round_trip(
            "<html lang=\"en\"><head><title>Motto</title></head><body>\
             <p>The words <q lang=\"fr\">Je me souviens</q> are the motto.</p></body></html>",
        );
        assert!(html.starts_with("<html lang=\"en\" xml:lang=\"en\">"));
        assert!(html.contains("<head><title>Motto</title></head>"));
        assert!(html.contains(
            "<p>The words <q lang=\"fr\">Je me souviens</q> are the motto.</p>"
        ));
    }

    #[test]
    fn test_round_trip_title_and_alt() {
        let html = round_trip(
            "<html><body><p title=\"T\">Body <img src=\"i.jpg\" alt=\"A\"></p></body></html>",
        );
        assert!(html.contains("<p title=\"T\">Body <img src=\"i.jpg\" alt=\"A\"></p>"));
    }

    #[test]
    fn test_round_trip_bare_ampersand() {
        let html = round_trip(
            "<html><head><title>Null Front &amp; Back Matter</title></head><body></body></html>",
        );
        assert!(html.contains("<title>Null Front &amp; Back Matter</title>"));

        let root = parse_html(&html).unwrap();
        assert!(root.text_content().contains("Null Front & Back Matter"));
    }

    #[test]
    fn test_round_trip_structure() {
        let source = "<html><head></head><body>\
            <div class=\"box\" id=\"main\">Intro <b>bold</b><br>\
            <table><tbody><tr><th>H</th><td data-l10n-id=\"cell.a\">A</td></tr></tbody></table>\
            <ul><li><a href=\"/x\" title=\"Go\">link</a> and <i>more</i></li></ul>\
            <script src=\"a.js\"></script><p lang=\"de\">Hallo<br>Welt</p></div>\
            </body></html>";
        let html = round_trip(source);

        let expected = parse_html(source).unwrap();
        let actual = parse_html(&html).unwrap();
        assert_eq!(actual.text_content(), expected.text_content());
        assert!(html.contains("<div class=\"box\" id=\"main\">Intro <b>bold</b><br><table>"));
        assert!(html.contains("<th>H</th><td data-l10n-id=\"cell.a\">A</td>"));
        assert!(html.contains("<li><a href=\"/x\" title=\"Go\">link</a> and <i>more</i></li>"));
        assert!(html.contains("<script src=\"a.js\"></script>"));
        assert!(html.contains("<p lang=\"de\">Hallo<br>Welt</p>"));
    }

    #[test]
    fn test_target_is_rendered() {
        let mut doc = XliffDocument::new("a.html", "en");
        doc.target_language = Some("fr".to_string());
        let mut unit = TransUnit::new("genid-1", "x-html-p", Variant::text("en", "Hello"));
        unit.target = Some(Variant::text("fr", "Bonjour"));
        let untranslated = TransUnit::new("genid-2", "x-html-p", Variant::text("en", "World"));
        doc.body.push(Unit::Group(Group {
            restype: "x-html-body".to_string(),
            children: vec![Unit::TransUnit(unit), Unit::TransUnit(untranslated)],
            ..Default::default()
        }));

        let root = xliff_to_html(&doc, &ConversionConfig::new()).unwrap();
        let html = serialize_html(&root).unwrap();
        assert_eq!(
            html,
            "<body lang=\"fr\" xml:lang=\"fr\"><p>Bonjour</p><p lang=\"en\">World</p></body>"
        );
    }

    #[test]
    fn test_round_trip_form_controls_and_code() {
        let source = "<html><head><style>p{color:red}</style></head><body>\
            <form><select name=\"c\"><option value=\"r\">Red</option><optgroup label=\"More\">\
            <option>Blue</option></optgroup></select><label>Note</label><textarea>Type here</textarea>\
            <button type=\"submit\">Send</button></form>\
            <p>Run <script>if (a < b) { go(); }</script>now</p>\
            <noscript><p>Enable JS</p></noscript><template id=\"t\"><p>Later</p></template>\
            <pre> </pre><script>var x=1;</script></body></html>";
        let html = round_trip(source);

        assert!(html.contains("<head><style>p{color:red}</style></head>"));
        assert!(html.contains(
            "<form><select name=\"c\"><option value=\"r\">Red</option><optgroup label=\"More\">\
             <option>Blue</option></optgroup></select><label>Note</label><textarea>Type here</textarea>\
             <button type=\"submit\">Send</button></form>"
        ));
        assert!(html.contains("<p>Run <script>if (a < b) { go(); }</script>now</p>"));
        assert!(html.contains("<noscript><p>Enable JS</p></noscript>"));
        assert!(html.contains("<template id=\"t\"><p>Later</p></template>"));
        assert!(html.contains("<pre> </pre><script>var x=1;</script></body>"));

        let expected = parse_html(source).unwrap();
        let actual = parse_html(&html).unwrap();
        assert_eq!(actual.text_content(), expected.text_content());
    }

    #[test]
    fn test_round_trip_custom_elements_and_attributes() {
        let source = "<html><head></head><body>\
            <my-widget>Hello</my-widget><datalist id=\"d\"></datalist>\
            <p v-on:click=\"go\" xml:lang=\"fr\">x</p>\
            <div xml:lang=\"de\" @click=\"open\"><p>y</p></div>\
            <svg viewbox=\"0 0 10 10\"><text x=\"1\">Label</text></svg></body></html>";
        let html = round_trip(source);

        assert!(html.contains("<my-widget>Hello</my-widget><datalist id=\"d\"></datalist>"));
        assert!(html.contains("<p v-on:click=\"go\" lang=\"fr\">x</p>"));
        assert!(html.contains("<div xml:lang=\"de\" @click=\"open\"><p>y</p></div>"));
        assert!(html.contains("<svg viewbox=\"0 0 10 10\"><text x=\"1\">Label</text></svg>"));
    }

    #[test]
    fn test_text_run_language() {
        let mut doc = XliffDocument::new("a.html", "en");
        doc.target_language = Some("fr".to_string());
        let run = TransUnit::new("genid-1", TEXT_RUN_RESTYPE, Variant::text("en", "Hi "));
        let mut translated = TransUnit::new("genid-2", TEXT_RUN_RESTYPE, Variant::text("en", "Yes "));
        translated.target = Some(Variant::text("fr", "Oui "));
        let p = TransUnit::new("genid-3", "x-html-p", Variant::text("en", "x"));
        doc.body.push(Unit::Group(Group {
            restype: "x-html-div".to_string(),
            children: vec![
                Unit::TransUnit(run),
                Unit::TransUnit(translated),
                Unit::TransUnit(p),
            ],
            ..Default::default()
        }));

        let root = xliff_to_html(&doc, &ConversionConfig::new()).unwrap();
        assert_eq!(
            serialize_html(&root).unwrap(),
            "<div lang=\"fr\" xml:lang=\"fr\"><span lang=\"en\">Hi </span>Oui <p lang=\"en\">x</p></div>"
        );
    }

    #[test]
    fn test_unknown_restype_is_fatal() {
        let mut doc = XliffDocument::new("a.html", "en");
        doc.body.push(Unit::Group(Group {
            restype: "paragraph".to_string(),
            ..Default::default()
        }));
        let err = xliff_to_html(&doc, &ConversionConfig::new()).unwrap_err();
        assert!(err.to_string().contains("paragraph"));
    }

    #[test]
    fn test_unknown_ctype_is_fatal() {
        let mut doc = XliffDocument::new("a.html", "en");
        doc.body.push(Unit::TransUnit(TransUnit::new(
            "genid-1",
            "x-html-p",
            Variant::new(
                "en",
                vec![Inline::Marker(Marker {
                    id: "genid-2".to_string(),
                    ctype: "x-unknown".to_string(),
                    ..Default::default()
                })],
            ),
        )));
        assert!(xliff_to_html(&doc, &ConversionConfig::new()).is_err());
    }
}
