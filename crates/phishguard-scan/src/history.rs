//! History store client: records outcomes and lists past scans.

use crate::error::{HistoryError, ScanError};
use crate::http::{build_http_client, extract_message, join_url};
use crate::outcome::LogRecord;
use async_trait::async_trait;
use phishguard_core::{HistoryConfig, SafetyScale, Username};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// The history store's answer to a log request.
///
/// Any response carrying an HTTP status is a reply, including error statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogReply {
    /// Whether the store accepted the record
    pub accepted: bool,
    /// Message from the store
    pub message: String,
}

/// A past scan as listed by the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The scanned URL
    pub url: String,
    /// Safety score
    pub score: f64,
    /// Verdict, when the store recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe: Option<bool>,
    /// Findings
    #[serde(default)]
    pub threats: Vec<String>,
    /// Outcome timestamp
    pub timestamp: String,
}

impl HistoryEntry {
    /// Recorded verdict, or one derived from the score.
    #[must_use]
    pub fn is_safe(&self, scale: &SafetyScale) -> bool {
        self.safe.unwrap_or_else(|| scale.is_safe(self.score))
    }
}

/// Durable per-user scan history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Submit one log record, without retrying.
    ///
    /// # Errors
    /// Returns error only when no response was received.
    async fn log_scan(&self, record: &LogRecord) -> Result<LogReply, HistoryError>;

    /// List the most recent scans of a user, newest first.
    ///
    /// # Errors
    /// Returns error on transport failure, non-2xx status or unreadable body.
    async fn fetch_history(
        &self,
        username: &Username,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, HistoryError>;
}

/// History store reached over HTTP.
pub struct HttpHistoryStore {
    client: Client,
    log_endpoint: String,
    history_endpoint: String,
    timeout_secs: u64,
}

impl HttpHistoryStore {
    /// Create a history client from configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &HistoryConfig) -> Result<Self, ScanError> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            log_endpoint: join_url(&config.base_url, &config.log_path),
            history_endpoint: join_url(&config.base_url, &config.history_path),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Full URL of the log endpoint.
    #[must_use]
    pub fn log_endpoint(&self) -> &str {
        &self.log_endpoint
    }

    /// Full URL of the history endpoint.
    #[must_use]
    pub fn history_endpoint(&self) -> &str {
        &self.history_endpoint
    }
}

/// Turn a log response into a reply.
#[must_use]
pub fn log_reply(status: u16, body: &str) -> LogReply {
    let accepted = (200..300).contains(&status);
    let message = extract_message(body).unwrap_or_else(|| {
        if accepted {
            "Scan saved to history".to_string()
        } else {
            format!("History store rejected the scan (status {status})")
        }
    });
    LogReply { accepted, message }
}

#[async_trait]
impl HistoryStore for HttpHistoryStore {
    async fn log_scan(&self, record: &LogRecord) -> Result<LogReply, HistoryError> {
        let response = self
            .client
            .post(&self.log_endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| HistoryError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status().as_u16();
        // The status already arrived; a lost body still counts as a reply.
        let body = response.text().await.unwrap_or_default();
        Ok(log_reply(status, &body))
    }

    async fn fetch_history(
        &self,
        username: &Username,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let response = self
            .client
            .get(&self.history_endpoint)
            .query(&[("username", username.as_str())])
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| HistoryError::from_reqwest(&e, self.timeout_secs))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HistoryError::from_reqwest(&e, self.timeout_secs))?;

        if !status.is_success() {
            return Err(HistoryError::Server {
                status: status.as_u16(),
                message: extract_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
            });
        }

        let mut entries: Vec<HistoryEntry> = serde_json::from_str(&body)
            .map_err(|e| HistoryError::Malformed(format!("failed to parse history: {e}")))?;
        entries.truncate(limit as usize);
        Ok(entries)
    }
}
