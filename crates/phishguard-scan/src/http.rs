//! HTTP helpers shared by the analyzer and history clients.

use crate::error::ScanError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Build an HTTP client with the given timeout.
///
/// # Errors
/// Returns error if the HTTP client cannot be created.
pub fn build_http_client(timeout_secs: u64) -> Result<Client, ScanError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("PhishGuard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ScanError::Client(e.to_string()))
}

/// Join a base URL and an endpoint path without doubling slashes.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
}

/// Pull a human-readable `detail` or `message` out of a JSON body.
///
/// `detail` may be a string or, as validation errors often are, a structured
/// value; the latter is rendered as compact JSON.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let parsed: MessageBody = serde_json::from_str(body).ok()?;
    let detail = parsed.detail.and_then(|value| match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    });
    detail
        .or(parsed.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(15).is_ok());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://127.0.0.1:5000/", "/api/scan-url"),
            "http://127.0.0.1:5000/api/scan-url"
        );
        assert_eq!(
            join_url("http://127.0.0.1:5000", "api/scan-url"),
            "http://127.0.0.1:5000/api/scan-url"
        );
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"detail": "URL cannot be empty"}"#).as_deref(),
            Some("URL cannot be empty")
        );
        assert_eq!(
            extract_message(r#"{"message": "Scan logged"}"#).as_deref(),
            Some("Scan logged")
        );
        assert_eq!(
            extract_message(r#"{"detail": [{"loc": ["body", "url"]}]}"#).as_deref(),
            Some(r#"[{"loc":["body","url"]}]"#)
        );
        assert_eq!(extract_message(r#"{"message": "  "}"#), None);
        assert_eq!(extract_message("<html>Bad Gateway</html>"), None);
    }
}
