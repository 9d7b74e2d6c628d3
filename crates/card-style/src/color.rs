//! Color parsing and canonicalization.
//!
//! Accepts the color notations that appear in card templates and produces a
//! single canonical spelling so that structured documents compare equal no
//! matter how the markup spelled the color.

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// CSS basic named colors (plus `orange`).
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("white", [0xff, 0xff, 0xff]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("red", [0xff, 0x00, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("fuchsia", [0xff, 0x00, 0xff]),
    ("green", [0x00, 0x80, 0x00]),
    ("lime", [0x00, 0xff, 0x00]),
    ("olive", [0x80, 0x80, 0x00]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("blue", [0x00, 0x00, 0xff]),
    ("teal", [0x00, 0x80, 0x80]),
    ("aqua", [0x00, 0xff, 0xff]),
    ("orange", [0xff, 0xa5, 0x00]),
];

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse a CSS color value.
    ///
    /// Supports `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` with
    /// integer or percentage channels, basic named colors and `transparent`.
    /// Returns `None` for anything else.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();

        if value == "transparent" {
            return Some(Self::TRANSPARENT);
        }
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
        {
            return parse_rgb_function(args.strip_suffix(')')?);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, [r, g, b])| Self::rgb(*r, *g, *b))
    }

    /// Whether the color is fully transparent.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Alpha as a `0.0..=1.0` opacity.
    #[must_use]
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Canonical spelling: `#rrggbb` for opaque colors, `#rrggbbaa` for
    /// translucent ones and `transparent` for zero alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        match self.a {
            0 => "transparent".to_owned(),
            0xff => format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
            a => format!("#{:02x}{:02x}{:02x}{a:02x}", self.r, self.g, self.b),
        }
    }
}

/// Canonicalize a CSS color value.
///
/// Returns `None` when the value is not a color this crate understands.
#[must_use]
pub fn canonical_color(value: &str) -> Option<String> {
    Color::parse(value).map(Color::to_hex)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color {
            a: nibble(3)?,
            ..Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)
        }),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color {
            a: byte(6)?,
            ..Color::rgb(byte(0)?, byte(2)?, byte(4)?)
        }),
        _ => None,
    }
}

/// Parse the argument list of `rgb()`/`rgba()`, comma or space separated.
fn parse_rgb_function(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    let a = match parts.get(3) {
        Some(alpha) => parse_alpha(alpha)?,
        None => 0xff,
    };

    Some(Color { r, g, b, a })
}

fn parse_channel(value: &str) -> Option<u8> {
    let raw = if let Some(percent) = value.strip_suffix('%') {
        percent.parse::<f32>().ok()? * 2.55
    } else {
        value.parse::<f32>().ok()?
    };
    Some(raw.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(value: &str) -> Option<u8> {
    let fraction = if let Some(percent) = value.strip_suffix('%') {
        percent.parse::<f32>().ok()? / 100.0
    } else {
        value.parse::<f32>().ok()?
    };
    Some((fraction.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#FFFFFF"), Some(Color::WHITE));
        assert_eq!(Color::parse("#00000000"), Some(Color::TRANSPARENT));
        assert_eq!(
            Color::parse("#11223380"),
            Some(Color {
                r: 0x11,
                g: 0x22,
                b: 0x33,
                a: 0x80
            })
        );
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gggggg"), None);
    }

    #[test]
    fn test_parse_rgb_function() {
        assert_eq!(Color::parse("rgb(255, 0, 0)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("rgb(0 128 0)"), Some(Color::rgb(0, 128, 0)));
        assert_eq!(
            Color::parse("rgba(0, 0, 0, 0.5)").map(|c| c.a),
            Some(128)
        );
        assert_eq!(Color::parse("rgb(100%, 0%, 0%)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("rgb(1, 2)"), None);
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(Color::parse("Black"), Some(Color::BLACK));
        assert_eq!(Color::parse(" navy "), Some(Color::rgb(0, 0, 0x80)));
        assert_eq!(Color::parse("transparent"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("rebeccapurple-ish"), None);
    }

    #[test]
    fn test_canonical_color() {
        assert_eq!(canonical_color("#FFF").as_deref(), Some("#ffffff"));
        assert_eq!(canonical_color("rgb(0, 0, 0)").as_deref(), Some("#000000"));
        assert_eq!(canonical_color("white").as_deref(), Some("#ffffff"));
        assert_eq!(canonical_color("transparent").as_deref(), Some("transparent"));
        assert_eq!(canonical_color("not-a-color"), None);
    }

    #[test]
    fn test_canonical_color_is_stable() {
        for value in ["#abc", "rgba(1, 2, 3, 0.25)", "orange", "transparent"] {
            let once = canonical_color(value).unwrap();
            assert_eq!(canonical_color(&once), Some(once.clone()));
        }
    }
}
