//! Structured document model.

use card_style::{canonical_color, normalize_font_family};
use serde::{Deserialize, Serialize};

/// Font used when the markup does not set one.
pub const DEFAULT_FONT: &str = "Arial";
/// Background color used when the markup does not set one.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
/// Text color used when the markup does not set one.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Fonts offered by the structured editor. Other values are accepted.
pub const FONT_CHOICES: [&str; 4] = ["Arial", "Helvetica", "Times New Roman", "Courier"];

/// Field-based view of a card template.
///
/// Missing JSON fields take the defaults, so `{"text": "Hello"}` is a valid
/// document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredDocument {
    /// Plain text content.
    pub text: String,
    /// Image URL or data URI; empty when there is no image.
    pub image: String,
    /// Font family list.
    pub font: String,
    /// Body background color.
    pub background_color: String,
    /// Body text color.
    pub text_color: String,
}

impl Default for StructuredDocument {
    fn default() -> Self {
        Self {
            text: String::new(),
            image: String::new(),
            font: DEFAULT_FONT.to_owned(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_owned(),
            text_color: DEFAULT_TEXT_COLOR.to_owned(),
        }
    }
}

impl StructuredDocument {
    /// Create a document with the given text and default styling.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Canonical form of the document.
    ///
    /// Text and image are trimmed, the font list is normalized and colors are
    /// spelled as lower-case hex. Empty style fields fall back to the
    /// defaults. Values that are not colors keep their trimmed spelling.
    ///
    /// Line breaks become `\n` and NUL characters are handled as HTML parsing
    /// handles them. Style values lose the characters the encoder cannot
    /// place in a declaration and any trailing `!important`. The result is
    /// left unchanged by [`encode`](crate::encode) followed by
    /// [`decode`](crate::decode).
    #[must_use]
    pub fn canonicalize(&self) -> Self {
        Self {
            text: canonical_text(&self.text),
            image: html_value(&self.image).trim().to_owned(),
            font: canonical_font(&self.font),
            background_color: canonical_color_or(&self.background_color, DEFAULT_BACKGROUND_COLOR),
            text_color: canonical_color_or(&self.text_color, DEFAULT_TEXT_COLOR),
        }
    }

    /// Read a field.
    #[must_use]
    pub fn get(&self, field: DocumentField) -> &str {
        match field {
            DocumentField::Text => &self.text,
            DocumentField::Image => &self.image,
            DocumentField::Font => &self.font,
            DocumentField::BackgroundColor => &self.background_color,
            DocumentField::TextColor => &self.text_color,
        }
    }

    /// Overwrite a field.
    pub fn set(&mut self, field: DocumentField, value: impl Into<String>) {
        let slot = match field {
            DocumentField::Text => &mut self.text,
            DocumentField::Image => &mut self.image,
            DocumentField::Font => &mut self.font,
            DocumentField::BackgroundColor => &mut self.background_color,
            DocumentField::TextColor => &mut self.text_color,
        };
        *slot = value.into();
    }
}

/// Editable fields of a [`StructuredDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentField {
    Text,
    Image,
    Font,
    BackgroundColor,
    TextColor,
}

impl DocumentField {
    /// All fields in editor order.
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Image,
        Self::Font,
        Self::BackgroundColor,
        Self::TextColor,
    ];

    /// JSON name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Font => "font",
            Self::BackgroundColor => "backgroundColor",
            Self::TextColor => "textColor",
        }
    }

    /// Look up a field by its JSON name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

pub(crate) fn canonical_font(value: &str) -> String {
    settle(value, |value| {
        let font = normalize_font_family(strip_important(&css_value(value)));
        if font.is_empty() {
            DEFAULT_FONT.to_owned()
        } else {
            font
        }
    })
}

pub(crate) fn canonical_color_or(value: &str, default: &str) -> String {
    settle(value, |value| {
        let value = css_value(value);
        let value = strip_important(&value);
        if value.is_empty() {
            return default.to_owned();
        }
        canonical_color(value).unwrap_or_else(|| value.to_owned())
    })
}

/// Body text as HTML parsing yields it: normalized line breaks, no NUL, trimmed.
fn canonical_text(text: &str) -> String {
    normalize_newlines(text).replace('\0', "").trim().to_owned()
}

/// Make a value safe to place in the encoded body rule.
///
/// Drops characters that would end the declaration, the rule or the style
/// element and breaks up comment openers, then applies HTML input handling.
pub(crate) fn css_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ';' | '{' | '}' | '<' | '>') || (c == '*' && out.ends_with('/')) {
            continue;
        }
        out.push(c);
    }
    html_value(&out).trim().to_owned()
}

/// Attribute and raw text as HTML parsing yields it.
fn html_value(value: &str) -> String {
    normalize_newlines(value).replace('\0', "\u{fffd}")
}

/// CRLF and lone CR become LF.
fn normalize_newlines(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Remove every trailing `!important` flag.
fn strip_important(value: &str) -> &str {
    let mut value = value.trim();
    while let Some(rest) = value.strip_suffix("!important") {
        value = rest.trim_end();
    }
    value
}

/// Apply `step` until the value stops changing.
///
/// After the first step every change only removes characters, so this ends.
fn settle(value: &str, step: impl Fn(&str) -> String) -> String {
    let mut current = step(value);
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
