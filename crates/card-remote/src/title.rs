//! Page title lookup.
//!
//! Two modes: through a title endpoint (`GET {endpoint}?url=<target>`,
//! answering `{"title": …}` or `{"error": …}`), or by fetching the target
//! page directly and reading its `<title>`.

use card_codec::dom::{find_first, parse_html, text_content};
use serde::Deserialize;
use ureq::Agent;

use crate::error::RemoteError;
use crate::flight::InFlight;
use crate::http::read_success;

/// Title endpoint response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TitleResponse {
    title: Option<String>,
    error: Option<String>,
}

/// Looks up the `<title>` of a web page.
#[derive(Debug, Clone)]
pub struct TitleLookup {
    agent: Agent,
    endpoint: Option<String>,
    in_flight: InFlight,
}

impl TitleLookup {
    /// Lookup that fetches target pages directly.
    #[must_use]
    pub fn direct(agent: Agent) -> Self {
        Self {
            agent,
            endpoint: None,
            in_flight: InFlight::new(),
        }
    }

    /// Lookup through a title endpoint.
    #[must_use]
    pub fn via_endpoint(agent: Agent, endpoint: impl Into<String>) -> Self {
        Self {
            agent,
            endpoint: Some(endpoint.into()),
            in_flight: InFlight::new(),
        }
    }

    /// Whether a lookup is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Fetch the title of `url`.
    ///
    /// Overlapping lookups are rejected with [`RemoteError::Busy`]. No retries.
    pub fn lookup(&self, url: &str) -> Result<String, RemoteError> {
        let _guard = self.in_flight.try_begin().ok_or(RemoteError::Busy)?;

        let url = url.trim();
        if url.is_empty() {
            return Err(RemoteError::MissingUrl);
        }

        let response = match &self.endpoint {
            Some(endpoint) => self.agent.get(endpoint).query("url", url).call()?,
            None => self.agent.get(url).call()?,
        };
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let status = response.status().as_u16();
        let body = match read_success(response) {
            Ok(mut body) => body.read_to_string()?,
            Err(RemoteError::Status { status, body }) => {
                return Err(RemoteError::Status {
                    status,
                    body: service_error(&body).unwrap_or(body),
                });
            }
            Err(e) => return Err(e),
        };

        let title = if content_type.contains("application/json") {
            let parsed: TitleResponse = serde_json::from_str(&body)?;
            match (parsed.title, parsed.error) {
                (Some(title), _) => title,
                (None, Some(error)) => return Err(RemoteError::Service(error)),
                (None, None) => String::new(),
            }
        } else if content_type.contains("text/html") {
            let dom = parse_html(&body);
            find_first(&dom.document, "title")
                .map(|title| text_content(&title))
                .unwrap_or_default()
        } else {
            return Err(RemoteError::UnexpectedContentType(content_type));
        };

        let title = title.trim();
        if title.is_empty() {
            return Err(RemoteError::NoTitle);
        }
        tracing::info!(url, status, title, "Title lookup succeeded");
        Ok(title.to_owned())
    }
}

/// `error` field of a JSON error body.
fn service_error(body: &str) -> Option<String> {
    serde_json::from_str::<TitleResponse>(body).ok()?.error
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::http::create_agent;

    fn agent() -> Agent {
        create_agent(Duration::from_secs(5))
    }

    #[test]
    fn test_direct_html_title() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><head><title>\n  Example Domain </title></head><body></body></html>")
            .create();

        let lookup = TitleLookup::direct(agent());
        let title = lookup.lookup(&format!("{}/page", server.url())).unwrap();
        assert_eq!(title, "Example Domain");
        assert!(!lookup.is_busy());
    }

    #[test]
    fn test_endpoint_json_title() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/get-title")
            .match_query(Matcher::UrlEncoded(
                "url".into(),
                "https://example.com/a?b=c".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"title": "Example"}"#)
            .create();

        let lookup = TitleLookup::via_endpoint(agent(), format!("{}/api/get-title", server.url()));
        let title = lookup.lookup("https://example.com/a?b=c").unwrap();

        mock.assert();
        assert_eq!(title, "Example");
    }

    #[test]
    fn test_server_error_carries_status() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/page")
            .with_status(500)
            .with_body("boom")
            .create();

        let err = TitleLookup::direct(agent())
            .lookup(&format!("{}/page", server.url()))
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_endpoint_error_message_surfaced() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/get-title")
            .match_query(Matcher::Any)
            .with_status(415)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Unexpected content type: image/png"}"#)
            .create();

        let err = TitleLookup::via_endpoint(agent(), format!("{}/api/get-title", server.url()))
            .lookup("https://example.com/logo.png")
            .unwrap_err();

        assert!(matches!(
            err,
            RemoteError::Status { status: 415, ref body } if body == "Unexpected content type: image/png"
        ));
    }

    #[test]
    fn test_missing_title() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>no title</body></html>")
            .create();

        let err = TitleLookup::direct(agent())
            .lookup(&format!("{}/page", server.url()))
            .unwrap_err();
        assert!(matches!(err, RemoteError::NoTitle));
    }

    #[test]
    fn test_unexpected_content_type() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/img")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body("png")
            .create();

        let err = TitleLookup::direct(agent())
            .lookup(&format!("{}/img", server.url()))
            .unwrap_err();
        assert!(matches!(err, RemoteError::UnexpectedContentType(ref t) if t == "image/png"));
    }

    #[test]
    fn test_empty_url_and_busy() {
        let lookup = TitleLookup::direct(agent());
        assert!(matches!(lookup.lookup("  "), Err(RemoteError::MissingUrl)));

        let _guard = lookup.in_flight.try_begin().unwrap();
        assert!(matches!(lookup.lookup("http://localhost/"), Err(RemoteError::Busy)));
    }
}
