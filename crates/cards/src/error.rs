//! CLI error types.

use std::path::PathBuf;

use card_config::ConfigError;
use card_export::CaptureError;
use card_remote::RemoteError;
use card_render::RenderError;
use card_vars::VariableError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Variables(#[from] VariableError),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template failed to render: {0}")]
    Render(#[from] RenderError),

    #[error("export failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("title lookup failed: {0}")]
    Remote(#[from] RemoteError),
}
