//! Markup ⇄ structured document transforms.

use card_style::{Color, Declaration, Stylesheet, parse_declarations};
use markup5ever_rcdom::Handle;
use quick_xml::escape::escape;

use crate::document::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR, StructuredDocument, canonical_color_or,
    canonical_font, css_value,
};
use crate::dom::{ElementView, attr, find_all, find_first, parse_html, text_content};

/// Extract a structured document from raw markup.
///
/// Never fails. Missing content and styles take the defaults (`""`, `Arial`,
/// `#ffffff`, `#000000`). Markup the encoder did not produce may lose
/// structure: only body text, the first image and the body's font and colors
/// survive.
#[must_use]
pub fn decode(raw: &str) -> StructuredDocument {
    let dom = parse_html(raw);
    let Some(body) = find_first(&dom.document, "body") else {
        return StructuredDocument::default();
    };

    let mut sheet = Stylesheet::default();
    for style in find_all(&dom.document, "style") {
        sheet.extend(Stylesheet::parse(&text_content(&style)));
    }

    let mut style = BodyStyle::resolve(&sheet, &body);
    if let Some(html) = find_first(&dom.document, "html") {
        let inherited = BodyStyle::resolve(&sheet, &html);
        style.font = style.font.or(inherited.font);
        style.color = style.color.or(inherited.color);
    }

    let image = find_first(&body, "img")
        .and_then(|img| attr(&img, "src"))
        .unwrap_or_default();

    let doc = StructuredDocument {
        text: text_content(&body).trim().to_owned(),
        image,
        font: canonical_font(style.font.as_deref().unwrap_or_default()),
        background_color: canonical_color_or(
            style.background.as_deref().unwrap_or_default(),
            DEFAULT_BACKGROUND_COLOR,
        ),
        text_color: canonical_color_or(
            style.color.as_deref().unwrap_or_default(),
            DEFAULT_TEXT_COLOR,
        ),
    };
    tracing::debug!(
        text_len = doc.text.len(),
        has_image = !doc.image.is_empty(),
        font = %doc.font,
        "Decoded markup"
    );
    doc
}

/// Produce the minimal markup for a structured document.
///
/// The body rule carries the font and colors, followed by an optional
/// `<img>` and a `<div>` holding the text. Text and attribute values are
/// escaped, so the output is well-formed for the strict renderer as well.
#[must_use]
pub fn encode(doc: &StructuredDocument) -> String {
    let image = if doc.image.is_empty() {
        String::new()
    } else {
        format!(
            "    <img src=\"{}\" alt=\"Preview\" />\n",
            escape(doc.image.as_str())
        )
    };

    format!(
        "<html>
  <head>
    <style>
      body {{ font-family: {font}; background-color: {background}; color: {color}; }}
    </style>
  </head>
  <body>
{image}    <div>{text}</div>
  </body>
</html>
",
        font = css_value(&doc.font),
        background = css_value(&doc.background_color),
        color = css_value(&doc.text_color),
        text = escape(doc.text.as_str()),
    )
}

/// Font and color declarations applying to one element.
#[derive(Debug, Default)]
struct BodyStyle {
    font: Option<String>,
    background: Option<String>,
    color: Option<String>,
}

impl BodyStyle {
    /// Stylesheet rules in document order, then the inline `style` attribute.
    fn resolve(sheet: &Stylesheet, element: &Handle) -> Self {
        let view = ElementView::of(element);
        let inline = attr(element, "style")
            .map(|s| parse_declarations(&s))
            .unwrap_or_default();

        let mut style = Self::default();
        for decl in sheet.matching(&view).chain(inline.iter()) {
            style.apply(decl);
        }
        style
    }

    fn apply(&mut self, decl: &Declaration) {
        match decl.property.as_str() {
            "font-family" => self.font = Some(decl.value.clone()),
            "background-color" => self.background = Some(decl.value.clone()),
            "background" if Color::parse(&decl.value).is_some() => {
                self.background = Some(decl.value.clone());
            }
            "color" => self.color = Some(decl.value.clone()),
            _ => {}
        }
    }
}
