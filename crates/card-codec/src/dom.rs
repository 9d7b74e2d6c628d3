//! Lenient HTML DOM helpers.
//!
//! Thin wrappers over `html5ever`'s reference-counted DOM. Parsing follows the
//! HTML5 tree construction rules, so any input produces a document.

use std::rc::Rc;

use card_style::SelectorSubject;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML document.
///
/// Missing `<html>`, `<head>` and `<body>` elements are synthesized.
#[must_use]
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .unwrap_or_default()
}

/// Lower-cased local name of an element node.
#[must_use]
pub fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// First element with the given tag name, in document order.
#[must_use]
pub fn find_first(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if element_name(child) == Some(tag) {
            return Some(Rc::clone(child));
        }
        if let Some(found) = find_first(child, tag) {
            return Some(found);
        }
    }
    None
}

/// All elements with the given tag name, in document order.
#[must_use]
pub fn find_all(handle: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_elements(handle, tag, &mut found);
    found
}

fn collect_elements(handle: &Handle, tag: &str, found: &mut Vec<Handle>) {
    for child in handle.children.borrow().iter() {
        if element_name(child) == Some(tag) {
            found.push(Rc::clone(child));
        }
        collect_elements(child, tag, found);
    }
}

/// Concatenated text of all descendant text nodes.
///
/// Text inside `<style>`, `<script>` and `<template>` is skipped.
#[must_use]
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    push_text(handle, &mut text);
    text
}

fn push_text(handle: &Handle, text: &mut String) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => text.push_str(&contents.borrow()),
            NodeData::Element { name, .. } => {
                if !matches!(name.local.as_ref(), "style" | "script" | "template") {
                    push_text(child, text);
                }
            }
            _ => {}
        }
    }
}

/// Attribute value by name.
#[must_use]
pub fn attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Owned view of an element's tag, id and classes for selector matching.
#[derive(Clone, Debug, Default)]
pub struct ElementView {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
}

impl ElementView {
    /// Build a view of an element node. Non-elements get an empty tag.
    #[must_use]
    pub fn of(handle: &Handle) -> Self {
        Self {
            tag: element_name(handle).unwrap_or_default().to_owned(),
            id: attr(handle, "id"),
            classes: attr(handle, "class")
                .map(|c| c.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
        }
    }
}

impl SelectorSubject for ElementView {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_synthesizes_body() {
        let dom = parse_html("just text");
        let body = find_first(&dom.document, "body").unwrap();
        assert_eq!(text_content(&body), "just text");
    }

    #[test]
    fn test_find_first_document_order() {
        let dom = parse_html(r#"<div><img src="a.png"></div><img src="b.png">"#);
        let img = find_first(&dom.document, "img").unwrap();
        assert_eq!(attr(&img, "src").as_deref(), Some("a.png"));
        assert_eq!(find_all(&dom.document, "img").len(), 2);
    }

    #[test]
    fn test_text_content_skips_style_and_script() {
        let dom = parse_html("<body><style>p{}</style><p>Hi</p><script>x()</script> there</body>");
        let body = find_first(&dom.document, "body").unwrap();
        assert_eq!(text_content(&body), "Hi there");
    }

    #[test]
    fn test_element_view_matches_selector() {
        let dom = parse_html(r#"<body id="main" class="card dark"></body>"#);
        let body = find_first(&dom.document, "body").unwrap();
        let view = ElementView::of(&body);
        assert_eq!(view.tag(), "body");
        assert_eq!(view.id(), Some("main"));
        assert!(view.has_class("dark"));
        assert!(!view.has_class("light"));
    }

    #[test]
    fn test_unclosed_markup_is_repaired() {
        let dom = parse_html("<html><title>  Page  </title><body><div>open");
        let title = find_first(&dom.document, "title").unwrap();
        assert_eq!(text_content(&title).trim(), "Page");
    }
}
