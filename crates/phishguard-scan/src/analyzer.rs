//! Analyzer client: asks the external service for a safety verdict.

use crate::error::{AnalyzeError, ScanError};
use crate::http::{build_http_client, extract_message, join_url};
use async_trait::async_trait;
use phishguard_core::{AnalyzerConfig, ScanUrl};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Verdict returned by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerVerdict {
    /// Safety score, 0-100, higher is safer
    pub score: f64,
    /// Findings reported by the analyzer
    #[serde(default)]
    pub threats: Vec<String>,
}

/// An external service that scores URLs.
///
/// Implementations must be thread-safe (Send + Sync) for use in async contexts.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Perform one analysis call, without retrying.
    ///
    /// # Errors
    /// Returns error on transport failure, non-2xx status or unreadable body.
    async fn analyze(&self, url: &ScanUrl) -> Result<AnalyzerVerdict, AnalyzeError>;
}

/// Analyzer reached over HTTP.
///
/// POSTs `{"url": ...}` and expects `{"score": ..., "threats": [...]}`.
pub struct HttpAnalyzer {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpAnalyzer {
    /// Create an analyzer client for `base_url` + `scan_path`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: &str, scan_path: &str, timeout_secs: u64) -> Result<Self, ScanError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            endpoint: join_url(base_url, scan_path),
            timeout_secs,
        })
    }

    /// Create an analyzer client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ScanError> {
        Self::new(&config.base_url, &config.scan_path, config.timeout_secs)
    }

    /// Full URL of the scan endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

/// Parse a 2xx analyzer body into a verdict.
///
/// # Errors
/// Returns `AnalyzeError::Malformed` if the body is not a verdict.
pub fn parse_verdict(body: &str) -> Result<AnalyzerVerdict, AnalyzeError> {
    let verdict: AnalyzerVerdict = serde_json::from_str(body)
        .map_err(|e| AnalyzeError::Malformed(format!("failed to parse verdict: {e}")))?;

    if !verdict.score.is_finite() {
        return Err(AnalyzeError::Malformed(format!(
            "score is not a finite number: {}",
            verdict.score
        )));
    }

    Ok(verdict)
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, url: &ScanUrl) -> Result<AnalyzerVerdict, AnalyzeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&AnalyzeRequest { url: url.as_str() })
            .send()
            .await
            .map_err(|e| AnalyzeError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzeError::from_reqwest(&e, self.timeout_secs))?;

        if !status.is_success() {
            return Err(AnalyzeError::Server {
                status: status.as_u16(),
                detail: extract_message(&body),
            });
        }

        parse_verdict(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_creation() {
        let analyzer = HttpAnalyzer::from_config(&AnalyzerConfig::default())
            .expect("create analyzer");
        assert_eq!(analyzer.endpoint(), "http://127.0.0.1:5000/api/scan-url");
        assert_eq!(analyzer.timeout_secs, 15);
    }

    #[test]
    fn test_parse_verdict() {
        let verdict = parse_verdict(r#"{"url": "https://a.com", "score": 90, "threats": ["URL safe"]}"#)
            .expect("parse verdict");
        assert!((verdict.score - 90.0).abs() < f64::EPSILON);
        assert_eq!(verdict.threats, vec!["URL safe"]);
    }

    #[test]
    fn test_parse_verdict_without_threats() {
        let verdict = parse_verdict(r#"{"score": 42.5}"#).expect("parse verdict");
        assert!(verdict.threats.is_empty());
    }

    #[test]
    fn test_parse_verdict_malformed() {
        assert!(matches!(
            parse_verdict(r#"{"threats": []}"#),
            Err(AnalyzeError::Malformed(_))
        ));
        assert!(matches!(
            parse_verdict(r#"{"score": "high"}"#),
            Err(AnalyzeError::Malformed(_))
        ));
        assert!(matches!(
            parse_verdict("not json"),
            Err(AnalyzeError::Malformed(_))
        ));
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(AnalyzeRequest {
            url: "https://example.com",
        })
        .expect("serialize request");
        assert_eq!(body, serde_json::json!({ "url": "https://example.com" }));
    }

    #[tokio::test]
    async fn test_unsendable_request_is_transport_error() {
        // rejected by the request builder, so nothing is sent
        let analyzer =
            HttpAnalyzer::new("not a base url", "/api/scan-url", 2).expect("create analyzer");
        let url = ScanUrl::parse("https://example.com").expect("valid url");

        let err = analyzer.analyze(&url).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport(_)), "got {err:?}");
        assert!(err.is_transient());
    }

    #[tokio::test]
    #[ignore = "requires nothing listening on 127.0.0.1:9"]
    async fn test_unreachable_analyzer_is_transport_error() {
        let analyzer = HttpAnalyzer::new("http://127.0.0.1:9", "/api/scan-url", 2)
            .expect("create analyzer");
        let url = ScanUrl::parse("https://example.com").expect("valid url");

        let err = analyzer.analyze(&url).await.unwrap_err();
        assert!(err.is_transient(), "expected transient error, got {err:?}");
    }
}
