use card_codec::ImageLoadError;

/// Editing error in the structured editor.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// A field edit arrived outside structured mode.
    #[error("structured editing is not active")]
    NotStructured,
    /// The selected image file could not be read.
    #[error(transparent)]
    Image(#[from] ImageLoadError),
}
