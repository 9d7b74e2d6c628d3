//! Strict JSX-like markup parser.
//!
//! Unlike the codec's lenient HTML parsing, evaluation demands well-formed
//! markup: every element closed or self-closing, matching end tags and
//! quoted attributes. Violations become [`RenderError::Markup`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::RenderError;
use crate::tree::{ElementNode, Node, VisualTree};

/// Pseudo-element holding the top-level nodes while parsing.
const FRAGMENT: &str = "#fragment";

/// Parse markup into a visual tree.
pub fn parse_markup(markup: &str) -> Result<VisualTree, RenderError> {
    if markup.trim().is_empty() {
        return Err(RenderError::Empty);
    }

    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut stack = vec![ElementNode::new(FRAGMENT)];
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| RenderError::markup(reader.error_position(), e.to_string()))?;
        let position = reader.buffer_position();

        match event {
            Event::Start(e) => stack.push(element(&reader, &e, position)?),
            Event::Empty(e) => {
                let child = element(&reader, &e, position)?;
                push_node(&mut stack, Node::Element(child));
            }
            Event::End(e) => {
                let name = decode(&reader, e.name().as_ref(), position)?.to_ascii_lowercase();
                let open = match stack.pop() {
                    Some(open) if open.tag != FRAGMENT => open,
                    _ => {
                        return Err(RenderError::markup(
                            position,
                            format!("unexpected closing tag </{name}>"),
                        ));
                    }
                };
                if open.tag != name {
                    return Err(RenderError::markup(
                        position,
                        format!("expected </{}>, found </{name}>", open.tag),
                    ));
                }
                push_node(&mut stack, Node::Element(open));
            }
            Event::Text(e) => {
                let text = decode(&reader, &e, position)?;
                push_text(&mut stack, &text);
            }
            Event::GeneralRef(e) => {
                let entity = decode(&reader, &e, position)?;
                let Some(text) = decode_entity(&entity) else {
                    return Err(RenderError::markup(
                        position,
                        format!("unknown entity &{entity};"),
                    ));
                };
                push_text(&mut stack, &text);
            }
            Event::CData(e) => push_text(&mut stack, &String::from_utf8_lossy(&e)),
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if stack.len() > 1 {
        let tag = stack.last().map(|open| open.tag.clone()).unwrap_or_default();
        return Err(RenderError::markup(
            markup.len() as u64,
            format!("unclosed element <{tag}>"),
        ));
    }

    let fragment = stack.pop().unwrap_or_default();
    Ok(build_tree(fragment.children))
}

fn element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    position: u64,
) -> Result<ElementNode, RenderError> {
    let tag = decode(reader, start.name().as_ref(), position)?.to_ascii_lowercase();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| RenderError::markup(position, e.to_string()))?;
        let key = decode(reader, attr.key.as_ref(), position)?.to_ascii_lowercase();
        let value = attr
            .unescape_value()
            .map_err(|e| RenderError::markup(position, e.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(ElementNode {
        tag,
        attrs,
        children: Vec::new(),
    })
}

fn decode(reader: &Reader<&[u8]>, bytes: &[u8], position: u64) -> Result<String, RenderError> {
    reader
        .decoder()
        .decode(bytes)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| RenderError::markup(position, e.to_string()))
}

fn push_node(stack: &mut [ElementNode], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Append text, merging with a preceding text node.
fn push_text(stack: &mut [ElementNode], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if let Some(Node::Text(last)) = parent.children.last_mut() {
        last.push_str(text);
    } else {
        parent.children.push(Node::Text(text.to_owned()));
    }
}

/// Resolve XML and common HTML entity references.
fn decode_entity(entity: &str) -> Option<String> {
    let named = match entity {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        "nbsp" => "\u{a0}",
        "copy" => "©",
        "reg" => "®",
        "trade" => "™",
        "hellip" => "…",
        "mdash" => "—",
        "ndash" => "–",
        "middot" => "·",
        "laquo" => "«",
        "raquo" => "»",
        s if s.starts_with('#') => {
            let code = if let Some(hex) = s.strip_prefix("#x").or_else(|| s.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            return code.and_then(char::from_u32).map(String::from);
        }
        _ => return None,
    };
    Some(named.to_owned())
}

/// Pick the visual root and pull `<style>` text out of the tree.
fn build_tree(top_level: Vec<Node>) -> VisualTree {
    let mut stylesheet = String::new();

    let mut visible = top_level.iter().filter(|node| !is_blank(node));
    let is_document = matches!(
        (visible.next(), visible.next()),
        (Some(Node::Element(html)), None) if html.tag == "html"
    );
    let mut root = if is_document {
        let html = top_level
            .into_iter()
            .find_map(|node| match node {
                Node::Element(html) => Some(html),
                Node::Text(_) => None,
            })
            .unwrap_or_default();
        document_body(html, &mut stylesheet)
    } else {
        ElementNode {
            tag: "div".to_owned(),
            attrs: Vec::new(),
            children: top_level,
        }
    };

    strip_non_visual(&mut root, &mut stylesheet);
    VisualTree { root, stylesheet }
}

/// Body of a full document; `<head>` only contributes its styles.
fn document_body(html: ElementNode, stylesheet: &mut String) -> ElementNode {
    let mut body = None;
    let mut stray = Vec::new();
    for child in html.children {
        match child {
            Node::Element(head) if head.tag == "head" => collect_styles(&head, stylesheet),
            Node::Element(b) if b.tag == "body" && body.is_none() => body = Some(b),
            other => stray.push(other),
        }
    }
    let mut body = body.unwrap_or_else(|| ElementNode::new("body"));
    if body.children.is_empty() {
        body.children = stray.into_iter().filter(|n| !is_blank(n)).collect();
    }
    body
}

fn is_blank(node: &Node) -> bool {
    matches!(node, Node::Text(text) if text.trim().is_empty())
}

fn collect_styles(element: &ElementNode, stylesheet: &mut String) {
    for child in element.elements() {
        if child.tag == "style" {
            append_style(stylesheet, &child.text_content());
        } else {
            collect_styles(child, stylesheet);
        }
    }
}

/// Move `<style>` text into the stylesheet; drop scripts and nested heads.
fn strip_non_visual(element: &mut ElementNode, stylesheet: &mut String) {
    element.children.retain_mut(|child| match child {
        Node::Element(el) if el.tag == "style" => {
            append_style(stylesheet, &el.text_content());
            false
        }
        Node::Element(el) if el.tag == "head" => {
            collect_styles(el, stylesheet);
            false
        }
        Node::Element(el) if el.tag == "script" => false,
        Node::Element(el) => {
            strip_non_visual(el, stylesheet);
            true
        }
        Node::Text(_) => true,
    });
}

fn append_style(stylesheet: &mut String, text: &str) {
    if !stylesheet.is_empty() {
        stylesheet.push('\n');
    }
    stylesheet.push_str(text.trim());
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fragment_wrapped_in_div() {
        let tree = parse_markup("<h1>Hi</h1><p>there</p>").unwrap();
        assert_eq!(tree.root.tag, "div");
        let tags: Vec<&str> = tree.root.elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["h1", "p"]);
    }

    #[test]
    fn test_document_uses_body_and_head_styles() {
        let tree = parse_markup(
            "<html><head><title>x</title><style>body { color: red; }</style></head>\
             <body class=\"card\"><div>Hello</div><script>alert(1)</script></body></html>",
        )
        .unwrap();

        assert_eq!(tree.root.tag, "body");
        assert_eq!(tree.root.attr("class"), Some("card"));
        assert_eq!(tree.stylesheet, "body { color: red; }");
        assert_eq!(tree.root.elements().count(), 1);
        assert_eq!(tree.root.text_content(), "Hello");
    }

    #[test]
    fn test_html_without_body_gets_empty_body() {
        let tree = parse_markup("<html><head></head></html>").unwrap();
        assert_eq!(tree.root, ElementNode::new("body"));
    }

    #[test]
    fn test_inline_styles_collected_and_removed() {
        let tree = parse_markup("<div><style>p { margin: 0 }</style><p>x</p></div>").unwrap();
        assert_eq!(tree.stylesheet, "p { margin: 0 }");
        let div = tree.root.elements().next().unwrap();
        assert_eq!(div.elements().count(), 1);
    }

    #[test]
    fn test_entities_and_attributes() {
        let tree = parse_markup(r#"<p title="a &amp; b">x &lt; y&nbsp;&#65;&#x42;</p>"#).unwrap();
        let p = tree.root.elements().next().unwrap();
        assert_eq!(p.attr("title"), Some("a & b"));
        assert_eq!(p.text_content(), "x < y\u{a0}AB");
    }

    #[test]
    fn test_self_closing_elements() {
        let tree = parse_markup(r#"<div><img src="a.png" /><br/></div>"#).unwrap();
        let div = tree.root.elements().next().unwrap();
        assert_eq!(div.elements().count(), 2);
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = parse_markup("<div><span>x</div>").unwrap_err();
        assert!(matches!(err, RenderError::Markup { .. }), "{err:?}");
    }

    #[test]
    fn test_unclosed_element() {
        let err = parse_markup("<div><br></div>").unwrap_err();
        assert!(matches!(err, RenderError::Markup { .. }), "{err:?}");

        let err = parse_markup("<div>open").unwrap_err();
        assert!(matches!(err, RenderError::Markup { .. }), "{err:?}");
    }

    #[test]
    fn test_unexpected_closing_tag() {
        let err = parse_markup("text</p>").unwrap_err();
        assert!(matches!(err, RenderError::Markup { .. }), "{err:?}");
    }

    #[test]
    fn test_unquoted_attribute_rejected() {
        let err = parse_markup("<img src=a.png />").unwrap_err();
        assert!(matches!(err, RenderError::Markup { .. }), "{err:?}");
    }

    #[test]
    fn test_empty_markup() {
        assert_eq!(parse_markup("  \n "), Err(RenderError::Empty));
    }
}
