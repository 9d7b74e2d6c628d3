//! Block and inline layout.
//!
//! Turns a [`VisualTree`] into a flat [`DisplayList`] of fills, text runs and
//! images positioned in CSS pixels. Glyph metrics are estimated from the font
//! size, so capture strategies that shape text themselves may differ slightly
//! in line width.

use card_style::{Color, Stylesheet, parse_length};

use crate::style::{ComputedStyle, Display, TextAlign};
use crate::tree::{ElementNode, Node, VisualTree};

/// Size of an image without explicit dimensions.
const DEFAULT_IMAGE_SIZE: f32 = 128.0;
/// Ascent as a fraction of the font size.
const ASCENT: f32 = 0.8;

/// Size of the preview in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One paint operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem {
    Fill {
        rect: Rect,
        color: Color,
    },
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font_family: String,
        font_size: f32,
        bold: bool,
        color: Color,
    },
    Image {
        rect: Rect,
        src: String,
    },
}

/// Paint operations in painting order.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayList {
    pub viewport: Viewport,
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Whether any text is painted.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, DisplayItem::Text { .. }))
    }

    /// Painted text runs joined by spaces.
    #[must_use]
    pub fn text(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                DisplayItem::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Estimated advance of one character.
#[must_use]
pub fn char_advance(font_size: f32, bold: bool) -> f32 {
    font_size * if bold { 0.6 } else { 0.55 }
}

/// Lay out the tree; the root box covers the viewport.
#[must_use]
pub fn layout(tree: &VisualTree, viewport: Viewport) -> DisplayList {
    let sheet = Stylesheet::parse(&tree.stylesheet);
    let mut root_style = ComputedStyle::resolve(&ComputedStyle::default(), &tree.root, &sheet);
    root_style.width = Some(viewport.width as f32);
    root_style.height = Some(viewport.height as f32);
    root_style.margin = card_style::Edges::default();

    let mut builder = LayoutBuilder {
        sheet,
        items: Vec::new(),
    };
    if root_style.display != Display::None {
        builder.block(&tree.root, &root_style, 0.0, 0.0, viewport.width as f32);
    }

    DisplayList {
        viewport,
        items: builder.items,
    }
}

struct LayoutBuilder {
    sheet: Stylesheet,
    items: Vec<DisplayItem>,
}

/// Block formatting state of one container.
struct Flow<'s> {
    x: f32,
    cursor: f32,
    width: f32,
    style: &'s ComputedStyle,
    run: InlineRun,
}

impl LayoutBuilder {
    /// Lay out a block box at `(x, y)`. Returns its outer height.
    fn block(
        &mut self,
        element: &ElementNode,
        style: &ComputedStyle,
        x: f32,
        y: f32,
        available: f32,
    ) -> f32 {
        let margin = style.margin;
        let padding = style.padding;
        let box_x = x + margin.left;
        let box_y = y + margin.top;
        let box_width = style
            .width
            .unwrap_or(available - margin.horizontal())
            .max(0.0);

        let background_slot = self.items.len();
        let mut flow = Flow {
            x: box_x + padding.left,
            cursor: box_y + padding.top,
            width: (box_width - padding.horizontal()).max(0.0),
            style,
            run: InlineRun::default(),
        };
        self.children(element, style, &mut flow);
        self.flush(&mut flow);

        let content_height = flow.cursor - (box_y + padding.top);
        let box_height = style
            .height
            .unwrap_or(content_height + padding.vertical());

        if !style.background.is_transparent() {
            self.items.insert(
                background_slot,
                DisplayItem::Fill {
                    rect: Rect {
                        x: box_x,
                        y: box_y,
                        width: box_width,
                        height: box_height,
                    },
                    color: style.background,
                },
            );
        }

        margin.top + box_height + margin.bottom
    }

    fn children(&mut self, element: &ElementNode, style: &ComputedStyle, flow: &mut Flow<'_>) {
        for child in &element.children {
            match child {
                Node::Text(text) => flow.run.push_text(text, style),
                Node::Element(el) => {
                    let child_style = ComputedStyle::resolve(style, el, &self.sheet);
                    match child_style.display {
                        Display::None => {}
                        _ if el.tag == "br" => flow.run.push_break(style.line_height_px()),
                        _ if el.tag == "img" => self.image(el, &child_style, flow),
                        Display::Inline => self.children(el, &child_style, flow),
                        Display::Block => {
                            self.flush(flow);
                            flow.cursor += self.block(el, &child_style, flow.x, flow.cursor, flow.width);
                        }
                    }
                }
            }
        }
    }

    fn image(&mut self, element: &ElementNode, style: &ComputedStyle, flow: &mut Flow<'_>) {
        self.flush(flow);

        let dimension = |name: &str| {
            element
                .attr(name)
                .and_then(|value| parse_length(value, style.font_size))
        };
        let width = dimension("width").or(style.width);
        let height = dimension("height").or(style.height);
        let (mut width, mut height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(side), None) | (None, Some(side)) => (side, side),
            (None, None) => (DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE),
        };
        if width > flow.width && width > 0.0 {
            height = height * flow.width / width;
            width = flow.width;
        }

        let margin = style.margin;
        if let Some(src) = element.attr("src").filter(|s| !s.is_empty()) {
            self.items.push(DisplayItem::Image {
                rect: Rect {
                    x: flow.x + margin.left,
                    y: flow.cursor + margin.top,
                    width,
                    height,
                },
                src: src.to_owned(),
            });
        }
        flow.cursor += margin.top + height + margin.bottom;
    }

    /// Break pending inline content into lines and paint them.
    fn flush(&mut self, flow: &mut Flow<'_>) {
        let pieces = std::mem::take(&mut flow.run).pieces;
        if pieces.is_empty() {
            return;
        }

        for line in break_lines(pieces, flow.width) {
            let free = (flow.width - line.width).max(0.0);
            let offset = match flow.style.text_align {
                TextAlign::Left => 0.0,
                TextAlign::Center => free / 2.0,
                TextAlign::Right => free,
            };
            for segment in line.segments {
                let font_size = segment.style.font_size;
                let half_leading = (line.height - font_size) / 2.0;
                self.items.push(DisplayItem::Text {
                    x: flow.x + offset + segment.x,
                    baseline: flow.cursor + half_leading + font_size * ASCENT,
                    text: segment.text,
                    font_family: segment.style.font_family,
                    font_size,
                    bold: segment.style.bold,
                    color: segment.style.color,
                });
            }
            flow.cursor += line.height;
        }
    }
}

/// Text properties of a word.
#[derive(Clone, Debug, PartialEq)]
struct TextStyle {
    font_family: String,
    font_size: f32,
    bold: bool,
    color: Color,
    line_height: f32,
}

impl TextStyle {
    fn of(style: &ComputedStyle) -> Self {
        Self {
            font_family: style.font_family.clone(),
            font_size: style.font_size,
            bold: style.bold,
            color: style.color,
            line_height: style.line_height_px(),
        }
    }

    fn advance(&self) -> f32 {
        char_advance(self.font_size, self.bold)
    }
}

enum Piece {
    Word {
        text: String,
        space_before: bool,
        style: TextStyle,
    },
    Break {
        height: f32,
    },
}

/// Inline content collected until the next block boundary.
#[derive(Default)]
struct InlineRun {
    pieces: Vec<Piece>,
    pending_space: bool,
}

impl InlineRun {
    /// Split text into words, collapsing whitespace.
    fn push_text(&mut self, text: &str, style: &ComputedStyle) {
        let mut space = self.pending_space || text.starts_with(char::is_whitespace);
        let mut any_word = false;
        for word in text.split_whitespace() {
            self.pieces.push(Piece::Word {
                text: word.to_owned(),
                space_before: space,
                style: TextStyle::of(style),
            });
            space = true;
            any_word = true;
        }
        self.pending_space = if any_word {
            text.ends_with(char::is_whitespace)
        } else {
            space
        };
    }

    fn push_break(&mut self, height: f32) {
        self.pieces.push(Piece::Break { height });
        self.pending_space = false;
    }
}

struct Segment {
    x: f32,
    text: String,
    style: TextStyle,
}

#[derive(Default)]
struct Line {
    segments: Vec<Segment>,
    width: f32,
    height: f32,
}

impl Line {
    fn push(&mut self, text: String, style: TextStyle, space: f32) {
        let width = text.chars().count() as f32 * style.advance();
        self.height = self.height.max(style.line_height);

        match self.segments.last_mut() {
            Some(last) if last.style == style => {
                if space > 0.0 {
                    last.text.push(' ');
                }
                last.text.push_str(&text);
            }
            _ => self.segments.push(Segment {
                x: self.width + space,
                text,
                style,
            }),
        }
        self.width += space + width;
    }
}

fn break_lines(pieces: Vec<Piece>, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();

    for piece in pieces {
        match piece {
            Piece::Break { height } => {
                if line.segments.is_empty() {
                    line.height = height;
                }
                lines.push(std::mem::take(&mut line));
            }
            Piece::Word {
                text,
                space_before,
                style,
            } => {
                let mut space = if space_before && !line.segments.is_empty() {
                    style.advance()
                } else {
                    0.0
                };
                let width = text.chars().count() as f32 * style.advance();
                if !line.segments.is_empty() && line.width + space + width > max_width {
                    lines.push(std::mem::take(&mut line));
                    space = 0.0;
                }
                line.push(text, style, space);
            }
        }
    }
    if !line.segments.is_empty() {
        lines.push(line);
    }
    lines
}
