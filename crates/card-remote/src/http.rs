//! Shared HTTP plumbing.

use std::time::Duration;

use ureq::Agent;
use ureq::http::Response;

use crate::error::RemoteError;

/// Create HTTP agent with the specified timeout.
///
/// Error statuses are returned as responses so callers can include the body
/// in their error.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Fetch a URL and return the response body as bytes.
pub fn fetch_bytes(agent: &Agent, url: &str) -> Result<Vec<u8>, RemoteError> {
    let response = agent.get(url).call()?;
    let bytes = read_success(response)?.read_to_vec()?;
    tracing::debug!(url, bytes = bytes.len(), "Fetched remote data");
    Ok(bytes)
}

/// Return the body of a 2xx response, or the status and body as an error.
pub(crate) fn read_success(response: Response<ureq::Body>) -> Result<ureq::Body, RemoteError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();
    if !(200..300).contains(&status) {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(RemoteError::Status {
            status,
            body: error_body,
        });
    }
    Ok(body)
}

/// Extract width and height from PNG image data.
///
/// PNG format: 8-byte signature, then IHDR chunk with width/height at bytes 16-24.
#[must_use]
pub fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 || &data[0..8] != b"\x89PNG\r\n\x1a\n" {
        return None;
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}
