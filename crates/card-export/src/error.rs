//! Capture error types.

use std::fmt;

use card_remote::RemoteError;

/// Why a capture or export failed.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Another export is running.
    #[error("an export is already in progress")]
    Busy,
    /// The preview handle no longer resolves.
    #[error("subtree not found")]
    SubtreeNotFound,
    /// The preview has no area.
    #[error("cannot capture a zero-size preview ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    /// The capture would exceed the pixel limit.
    #[error("cannot allocate a {width}x{height} capture (limit {} pixels)", card_config::MAX_EXPORT_PIXELS)]
    TooLarge { width: u64, height: u64 },
    /// No capture strategy was configured.
    #[error("no capture strategies configured")]
    NoStrategies,
    /// Font data could not be loaded.
    #[error("font loading failed: {0}")]
    Fonts(String),
    /// Rasterization failed.
    #[error("rasterization failed: {0}")]
    Rasterize(String),
    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    /// Remote rendering failed.
    #[error("network error: {0}")]
    Remote(#[from] RemoteError),
    /// Every configured strategy failed.
    #[error("all capture strategies failed: {}", FailureList(.0))]
    AllFailed(Vec<StrategyFailure>),
    /// The export configuration is unusable.
    #[error("invalid export configuration: {0}")]
    Config(#[from] card_config::ConfigError),
    /// The exported file could not be written.
    #[error("failed to deliver export: {0}")]
    Delivery(#[from] std::io::Error),
}

/// Reason one strategy gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub reason: String,
}

struct FailureList<'a>(&'a [StrategyFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.strategy, failure.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_failed_lists_reasons() {
        let err = CaptureError::AllFailed(vec![
            StrategyFailure {
                strategy: "vector",
                reason: "rasterization failed: bad svg".to_owned(),
            },
            StrategyFailure {
                strategy: "remote",
                reason: "network error: HTTP 502".to_owned(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "all capture strategies failed: vector: rasterization failed: bad svg; remote: network error: HTTP 502"
        );
    }

    #[test]
    fn test_subtree_not_found_message() {
        assert_eq!(CaptureError::SubtreeNotFound.to_string(), "subtree not found");
    }
}
