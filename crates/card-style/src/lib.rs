//! CSS primitives for card templates.
//!
//! Card templates carry their styling in a small subset of CSS: inline
//! `style` attributes and `<style>` blocks with simple selectors. This crate
//! provides the pieces shared by the markup codec and the live renderer:
//!
//! - [`parse_declarations`] / [`Stylesheet`]: declaration and rule parsing
//! - [`Selector`]: simple selector matching against a [`SelectorSubject`]
//! - [`Color`] / [`canonical_color`]: color parsing and canonical hex output
//! - [`normalize_font_family`]: font-family list normalization
//! - [`Edges`] / [`parse_length`]: box edge and length values
//!
//! # Example
//!
//! ```
//! use card_style::{Stylesheet, canonical_color};
//!
//! let sheet = Stylesheet::parse("body { color: rgb(255, 0, 0); }");
//! let color = &sheet.rules[0].declarations[0].value;
//! assert_eq!(canonical_color(color).as_deref(), Some("#ff0000"));
//! ```

mod color;
mod css;
mod font;
mod length;

pub use color::{Color, canonical_color};
pub use css::{
    Declaration, Rule, Selector, SelectorSubject, Stylesheet, parse_declarations,
};
pub use font::normalize_font_family;
pub use length::{Edges, parse_length};
