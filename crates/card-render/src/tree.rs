//! Visual tree produced by the renderer.

use card_style::SelectorSubject;
use quick_xml::escape::escape;

/// Elements that never have children when serialized.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// A node of the visual tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(ElementNode),
    Text(String),
}

/// An element with its attributes in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementNode {
    /// Lower-cased tag name.
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl ElementNode {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated descendant text.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => text.push_str(t),
                Node::Element(element) => text.push_str(&element.text_content()),
            }
        }
        text
    }

    /// Serialize the element and its subtree as markup.
    pub fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() && VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(&escape(text.as_str())),
                Node::Element(element) => element.write_markup(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl SelectorSubject for ElementNode {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .or_else(|| self.attr("classname"))
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Rendered template: a root element plus the collected stylesheet text.
///
/// The root fills the preview viewport. It is the template's `<body>` when
/// the markup is a full document, otherwise an implicit `div` wrapping the
/// top-level nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualTree {
    pub root: ElementNode,
    /// Text of every `<style>` element, in document order.
    pub stylesheet: String,
}

impl VisualTree {
    /// Serialize as a standalone HTML document.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::from("<html><head><style>");
        out.push_str(&self.stylesheet);
        out.push_str("</style></head>");
        if self.root.tag == "body" {
            self.root.write_markup(&mut out);
        } else {
            out.push_str("<body>");
            self.root.write_markup(&mut out);
            out.push_str("</body>");
        }
        out.push_str("</html>");
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> ElementNode {
        ElementNode {
            tag: "div".to_owned(),
            attrs: vec![("className".to_owned(), "card".to_owned())],
            children: vec![
                Node::Text("a < b".to_owned()),
                Node::Element(ElementNode {
                    tag: "img".to_owned(),
                    attrs: vec![("src".to_owned(), "x.png?a=1&b=2".to_owned())],
                    children: Vec::new(),
                }),
            ],
        }
    }

    #[test]
    fn test_write_markup_escapes() {
        let mut out = String::new();
        sample().write_markup(&mut out);
        assert_eq!(
            out,
            r#"<div className="card">a &lt; b<img src="x.png?a=1&amp;b=2" /></div>"#
        );
    }

    #[test]
    fn test_to_markup_wraps_non_body_root() {
        let tree = VisualTree {
            root: ElementNode::new("div"),
            stylesheet: "p { color: red; }".to_owned(),
        };
        assert_eq!(
            tree.to_markup(),
            "<html><head><style>p { color: red; }</style></head><body><div></div></body></html>"
        );
    }

    #[test]
    fn test_text_content() {
        assert_eq!(sample().text_content(), "a < b");
    }
}
