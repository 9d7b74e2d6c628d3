//! Lengths and box edges.

/// Root font size used to resolve `rem`.
const ROOT_FONT_SIZE: f32 = 16.0;

/// Parse a CSS length into pixels.
///
/// Accepts `px`, unitless numbers, `em` (relative to `font_size`), `rem` and
/// `pt`. Percentages and keywords return `None`.
#[must_use]
pub fn parse_length(value: &str, font_size: f32) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    let (number, scale) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("rem") {
        (n, ROOT_FONT_SIZE)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, font_size)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, 96.0 / 72.0)
    } else {
        (value.as_str(), 1.0)
    };
    let parsed = number.trim().parse::<f32>().ok()?;
    parsed.is_finite().then_some(parsed * scale)
}

/// Four box edges in pixels (padding or margin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    /// Same value on every edge.
    #[must_use]
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Parse the 1-4 value shorthand (`padding: 4px 8px`).
    ///
    /// Returns `None` when any component is not a length.
    #[must_use]
    pub fn parse(value: &str, font_size: f32) -> Option<Self> {
        let parts = value
            .split_whitespace()
            .map(|part| parse_length(part, font_size))
            .collect::<Option<Vec<f32>>>()?;

        match parts[..] {
            [all] => Some(Self::uniform(all)),
            [vertical, horizontal] => Some(Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, horizontal, bottom] => Some(Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            }),
            [top, right, bottom, left] => Some(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => None,
        }
    }

    /// Sum of left and right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}
