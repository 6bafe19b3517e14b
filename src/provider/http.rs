//! Shared HTTP client, SSE parsing, and auth utilities.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::CompanionError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Transport timeout for one request, including the whole streamed body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default HTTP client");
                reqwest::Client::new()
            })
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(mut val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// One meaningful line of a server-sent event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Payload of a `data:` line.
    Data(&'a str),
    /// The `data: [DONE]` terminator.
    Done,
}

/// Parse an SSE line. Comments, blank lines and other fields yield `None`.
pub fn parse_sse_line(line: &str) -> Option<SseLine<'_>> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(SseLine::Done);
    }
    Some(SseLine::Data(data))
}

/// Turn a non-success HTTP status into an error.
pub fn status_to_error(status: u16, body: &str) -> CompanionError {
    let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
    match status {
        401 | 403 => CompanionError::Authentication(message),
        _ => CompanionError::api(status, message),
    }
}

/// Pull `error.message` out of an OpenAI-style error body.
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sse_line_variants() {
        assert_eq!(parse_sse_line("data: {\"a\":1}"), Some(SseLine::Data("{\"a\":1}")));
        assert_eq!(parse_sse_line("data:{\"a\":1}"), Some(SseLine::Data("{\"a\":1}")));
        assert_eq!(parse_sse_line("data: [DONE]"), Some(SseLine::Done));
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("event: ping"), None);
    }

    #[test]
    fn status_to_error_uses_api_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        match status_to_error(401, body) {
            CompanionError::Authentication(msg) => assert_eq!(msg, "Incorrect API key provided"),
            other => panic!("expected Authentication, got {other:?}"),
        }
    }

    #[test]
    fn status_to_error_keeps_raw_body_when_not_json() {
        match status_to_error(502, "Bad Gateway") {
            CompanionError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn bearer_header_is_marked_sensitive() {
        let headers = bearer_headers("sk-secret");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }
}
