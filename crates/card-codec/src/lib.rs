//! Structured document model and markup codec.
//!
//! The structured editor works on a [`StructuredDocument`] (text, image, font
//! and colors) while raw markup stays authoritative for rendering. [`decode`]
//! extracts a document from any markup; [`encode`] produces minimal markup
//! for a document. For encoder output the pair round-trips:
//!
//! ```
//! use card_codec::{StructuredDocument, decode, encode};
//!
//! let doc = StructuredDocument::with_text("Hello");
//! assert_eq!(decode(&encode(&doc)), doc);
//! ```
//!
//! Hand-written markup decodes fail-soft; structure the encoder never
//! produces is dropped.

mod codec;
mod document;
pub mod dom;
mod image;

pub use codec::{decode, encode};
pub use document::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_FONT, DEFAULT_TEXT_COLOR, DocumentField, FONT_CHOICES,
    StructuredDocument,
};
pub use image::{ImageLoadError, image_data_uri};
