//! Error types for remote operations.

/// Error from a remote render, title lookup or font fetch.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Request failed (connection, timeout, malformed URL).
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or the service's error message.
        body: String,
    },

    /// Service answered 2xx with an error message instead of a result.
    #[error("{0}")]
    Service(String),

    /// Title lookup needs a URL.
    #[error("URL is required")]
    MissingUrl,

    /// Page has no (or an empty) `<title>`.
    #[error("No title found")]
    NoTitle,

    /// Response is neither HTML nor JSON.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// Remote render returned something other than a PNG.
    #[error("Remote render returned invalid PNG data")]
    InvalidImage,

    /// Another request of the same kind is still running.
    #[error("Another request is already in progress")]
    Busy,

    /// Malformed JSON response.
    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

impl RemoteError {
    /// HTTP status code, when the server answered with an error status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
