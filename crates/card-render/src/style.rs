//! Computed style resolution.
//!
//! Cascade order: user-agent defaults for the tag, stylesheet rules in
//! document order, then the inline `style` attribute. Font, color, alignment
//! and line height inherit from the parent; boxes and backgrounds do not.

use card_style::{
    Color, Declaration, Edges, Stylesheet, normalize_font_family, parse_declarations, parse_length,
};

use crate::tree::ElementNode;

/// Tags laid out as inline content.
const INLINE_TAGS: &[&str] = &[
    "span", "b", "strong", "em", "i", "a", "small", "code", "u", "label", "sub", "sup", "mark",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LineHeight {
    /// 1.2 × font size.
    #[default]
    Normal,
    /// Multiple of the element's own font size; inherited as a factor.
    Factor(f32),
    Px(f32),
}

/// Style of one element after the cascade.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedStyle {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub color: Color,
    pub text_align: TextAlign,
    pub line_height: LineHeight,
    pub background: Color,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub padding: Edges,
    pub margin: Edges,
    pub display: Display,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_owned(),
            font_size: 16.0,
            bold: false,
            color: Color::BLACK,
            text_align: TextAlign::Left,
            line_height: LineHeight::Normal,
            background: Color::TRANSPARENT,
            width: None,
            height: None,
            padding: Edges::default(),
            margin: Edges::default(),
            display: Display::Block,
        }
    }
}

impl ComputedStyle {
    /// Resolve the style of `element` whose parent has `parent` style.
    #[must_use]
    pub fn resolve(parent: &Self, element: &ElementNode, sheet: &Stylesheet) -> Self {
        let mut style = Self {
            font_family: parent.font_family.clone(),
            font_size: parent.font_size,
            bold: parent.bold,
            color: parent.color,
            text_align: parent.text_align,
            line_height: parent.line_height,
            display: if INLINE_TAGS.contains(&element.tag.as_str()) {
                Display::Inline
            } else {
                Display::Block
            },
            ..Self::default()
        };
        style.apply_user_agent(&element.tag);

        let inline = element
            .attr("style")
            .map(parse_declarations)
            .unwrap_or_default();
        let declarations: Vec<&Declaration> = sheet.matching(element).chain(inline.iter()).collect();

        // Relative lengths resolve against the final font size.
        for decl in declarations.iter().filter(|d| d.property == "font-size") {
            if let Some(size) = parse_font_size(&decl.value, parent.font_size) {
                style.font_size = size;
            }
        }
        for decl in declarations.iter().filter(|d| d.property != "font-size") {
            style.apply(decl);
        }
        style
    }

    /// Line box height in pixels.
    #[must_use]
    pub fn line_height_px(&self) -> f32 {
        match self.line_height {
            LineHeight::Normal => self.font_size * 1.2,
            LineHeight::Factor(factor) => self.font_size * factor,
            LineHeight::Px(px) => px,
        }
    }

    fn apply_user_agent(&mut self, tag: &str) {
        let heading = match tag {
            "h1" => Some(32.0),
            "h2" => Some(24.0),
            "h3" => Some(18.72),
            _ => None,
        };
        if let Some(size) = heading {
            self.font_size = size;
            self.bold = true;
        }
        if heading.is_some() || tag == "p" {
            self.margin.bottom = self.font_size * 0.5;
        }
        if matches!(tag, "strong" | "b") {
            self.bold = true;
        }
    }

    fn apply(&mut self, decl: &Declaration) {
        let value = decl.value.as_str();
        match decl.property.as_str() {
            "font-family" => {
                let family = normalize_font_family(value);
                if !family.is_empty() {
                    self.font_family = family;
                }
            }
            "font-weight" => {
                if let Some(bold) = parse_font_weight(value) {
                    self.bold = bold;
                }
            }
            "color" => {
                if let Some(color) = Color::parse(value) {
                    self.color = color;
                }
            }
            "background-color" | "background" => {
                if let Some(color) = Color::parse(value) {
                    self.background = color;
                }
            }
            "text-align" => {
                self.text_align = match value.to_ascii_lowercase().as_str() {
                    "center" => TextAlign::Center,
                    "right" | "end" => TextAlign::Right,
                    _ => TextAlign::Left,
                };
            }
            "line-height" => {
                if let Some(line_height) = parse_line_height(value, self.font_size) {
                    self.line_height = line_height;
                }
            }
            "width" => self.width = parse_length(value, self.font_size),
            "height" => self.height = parse_length(value, self.font_size),
            "padding" => {
                if let Some(edges) = Edges::parse(value, self.font_size) {
                    self.padding = edges;
                }
            }
            "margin" => {
                if let Some(edges) = Edges::parse(value, self.font_size) {
                    self.margin = edges;
                }
            }
            side @ ("padding-top" | "padding-right" | "padding-bottom" | "padding-left") => {
                if let Some(px) = parse_length(value, self.font_size) {
                    set_side(&mut self.padding, &side["padding-".len()..], px);
                }
            }
            side @ ("margin-top" | "margin-right" | "margin-bottom" | "margin-left") => {
                if let Some(px) = parse_length(value, self.font_size) {
                    set_side(&mut self.margin, &side["margin-".len()..], px);
                }
            }
            "display" => {
                self.display = match value.to_ascii_lowercase().as_str() {
                    "none" => Display::None,
                    "inline" | "inline-block" => Display::Inline,
                    _ => Display::Block,
                };
            }
            _ => {}
        }
    }
}

fn set_side(edges: &mut Edges, side: &str, px: f32) {
    match side {
        "top" => edges.top = px,
        "right" => edges.right = px,
        "bottom" => edges.bottom = px,
        _ => edges.left = px,
    }
}

fn parse_font_size(value: &str, parent_size: f32) -> Option<f32> {
    if let Some(percent) = value.trim().strip_suffix('%') {
        return percent.trim().parse::<f32>().ok().map(|p| parent_size * p / 100.0);
    }
    parse_length(value, parent_size).filter(|size| *size > 0.0)
}

fn parse_font_weight(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(true),
        "normal" | "lighter" => Some(false),
        numeric => numeric.parse::<u16>().ok().map(|w| w >= 600),
    }
}

fn parse_line_height(value: &str, font_size: f32) -> Option<LineHeight> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("normal") {
        return Some(LineHeight::Normal);
    }
    if let Ok(factor) = value.parse::<f32>() {
        return Some(LineHeight::Factor(factor));
    }
    parse_length(value, font_size).map(LineHeight::Px)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn element(tag: &str, style: Option<&str>) -> ElementNode {
        ElementNode {
            tag: tag.to_owned(),
            attrs: style
                .map(|s| vec![("style".to_owned(), s.to_owned())])
                .unwrap_or_default(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_user_agent_heading() {
        let style = ComputedStyle::resolve(
            &ComputedStyle::default(),
            &element("h1", None),
            &Stylesheet::default(),
        );
        assert_eq!(style.font_size, 32.0);
        assert!(style.bold);
        assert_eq!(style.margin.bottom, 16.0);
        assert_eq!(style.display, Display::Block);
    }

    #[test]
    fn test_inheritance() {
        let sheet = Stylesheet::parse("div { color: red; background: blue; text-align: center; }");
        let parent = ComputedStyle::resolve(&ComputedStyle::default(), &element("div", None), &sheet);
        let child = ComputedStyle::resolve(&parent, &element("span", None), &sheet);

        assert_eq!(child.color, Color::rgb(255, 0, 0));
        assert_eq!(child.text_align, TextAlign::Center);
        assert_eq!(child.background, Color::TRANSPARENT);
        assert_eq!(child.display, Display::Inline);
    }

    #[test]
    fn test_inline_style_wins_and_em_uses_own_font_size() {
        let sheet = Stylesheet::parse("p { color: red; font-size: 10px; }");
        let style = ComputedStyle::resolve(
            &ComputedStyle::default(),
            &element("p", Some("color: #00f; font-size: 2em; padding: 1em 0")),
            &sheet,
        );
        assert_eq!(style.color, Color::rgb(0, 0, 255));
        assert_eq!(style.font_size, 32.0);
        assert_eq!(style.padding.top, 32.0);
        assert_eq!(style.padding.left, 0.0);
    }

    #[test]
    fn test_line_height_variants() {
        let base = ComputedStyle::default();
        assert_eq!(base.line_height_px(), 16.0 * 1.2);

        let factor = ComputedStyle::resolve(&base, &element("div", Some("line-height: 1.5")), &Stylesheet::default());
        assert_eq!(factor.line_height_px(), 24.0);

        let px = ComputedStyle::resolve(&base, &element("div", Some("line-height: 20px")), &Stylesheet::default());
        assert_eq!(px.line_height_px(), 20.0);
    }

    #[test]
    fn test_display_and_weight() {
        let base = ComputedStyle::default();
        let hidden = ComputedStyle::resolve(&base, &element("div", Some("display: none")), &Stylesheet::default());
        assert_eq!(hidden.display, Display::None);

        let bold = ComputedStyle::resolve(&base, &element("span", Some("font-weight: 700")), &Stylesheet::default());
        assert!(bold.bold);
    }
}
