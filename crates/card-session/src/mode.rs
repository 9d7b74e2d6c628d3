//! Editing modes.

use card_codec::StructuredDocument;

/// How the user is editing the template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    /// Raw markup editing.
    #[default]
    Code,
    /// Field editing on a decoded document.
    ///
    /// Every field edit is encoded back into the raw markup, which stays
    /// authoritative for rendering.
    Structured(StructuredDocument),
}

impl EditMode {
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// The document being edited, in structured mode.
    #[must_use]
    pub fn document(&self) -> Option<&StructuredDocument> {
        match self {
            Self::Structured(doc) => Some(doc),
            Self::Code => None,
        }
    }
}
