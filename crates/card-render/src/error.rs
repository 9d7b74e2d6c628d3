//! Render errors.

/// Error evaluating a template.
///
/// Render errors are shown next to the preview. They never abort the host;
/// the renderer keeps its last good tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// Nothing to render.
    #[error("Template is empty")]
    Empty,

    /// Malformed placeholder.
    #[error("Template error at offset {offset}: {message}")]
    Template { offset: usize, message: String },

    /// Markup is not well-formed.
    #[error("Markup error at position {position}: {message}")]
    Markup { position: u64, message: String },
}

impl RenderError {
    pub(crate) fn template(offset: usize, message: impl Into<String>) -> Self {
        Self::Template {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn markup(position: u64, message: impl Into<String>) -> Self {
        Self::Markup {
            position,
            message: message.into(),
        }
    }
}
