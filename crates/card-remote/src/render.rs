//! Remote rendering service client.

use serde::Serialize;
use ureq::Agent;

use crate::error::RemoteError;
use crate::http::{png_dimensions, read_success};

/// JSON payload accepted by the rendering service.
#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    css: &'a str,
    width: u32,
    height: u32,
}

/// Client for an external HTML-to-PNG rendering service.
#[derive(Debug, Clone)]
pub struct RemoteRenderClient {
    agent: Agent,
    url: String,
}

impl RemoteRenderClient {
    #[must_use]
    pub fn new(agent: Agent, url: impl Into<String>) -> Self {
        Self {
            agent,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit markup and extra CSS; returns the PNG bytes.
    ///
    /// Issues exactly one request; there are no retries.
    pub fn render(
        &self,
        html: &str,
        css: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RemoteError> {
        let payload = RenderRequest {
            html,
            css,
            width,
            height,
        };
        tracing::info!(url = %self.url, width, height, "Requesting remote render");

        let response = self
            .agent
            .post(&self.url)
            .header("Accept", "image/png")
            .send_json(&payload)?;
        let data = read_success(response)?.read_to_vec()?;

        if png_dimensions(&data).is_none() {
            return Err(RemoteError::InvalidImage);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::Matcher;

    use super::*;
    use crate::http::create_agent;

    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut data = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR".to_vec();
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data
    }

    fn client(server: &mockito::Server) -> RemoteRenderClient {
        RemoteRenderClient::new(
            create_agent(Duration::from_secs(5)),
            format!("{}/render", server.url()),
        )
    }

    #[test]
    fn test_render_posts_json_payload() {
        let mut server = mockito::Server::new();
        let png = png_header(1200, 630);
        let mock = server
            .mock("POST", "/render")
            .match_body(Matcher::Json(serde_json::json!({
                "html": "<p>Hi</p>",
                "css": "p { color: red; }",
                "width": 1200,
                "height": 630,
            })))
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(&png)
            .create();

        let data = client(&server)
            .render("<p>Hi</p>", "p { color: red; }", 1200, 630)
            .unwrap();

        mock.assert();
        assert_eq!(data, png);
    }

    #[test]
    fn test_render_error_status() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/render")
            .with_status(502)
            .with_body("upstream down")
            .create();

        let err = client(&server).render("<p/>", "", 10, 10).unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_render_rejects_non_png() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/render")
            .with_status(200)
            .with_body("<html>not an image</html>")
            .create();

        let err = client(&server).render("<p/>", "", 10, 10).unwrap_err();
        assert!(matches!(err, RemoteError::InvalidImage));
    }
}
