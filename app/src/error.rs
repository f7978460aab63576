//! Error type for application commands.

use phishguard_core::{ConfigError, PhishGuardError};
use phishguard_scan::{HistoryError, ScanError};
use serde::Serialize;
use thiserror::Error;

/// Serializable error returned by commands.
#[derive(Debug, Error, Serialize)]
#[error("{code}: {message}")]
pub struct CommandError {
    /// Error code for frontend handling (e.g., "INVALID_URL")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional debugging context
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl From<ScanError> for CommandError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidInput(msg) => Self::new("INVALID_URL", msg),
            ScanError::InProgress => Self::new(
                "SCAN_IN_PROGRESS",
                "A scan is already running. Wait for it to finish.",
            ),
            ScanError::Client(msg) => {
                Self::new("CLIENT_ERROR", format!("Failed to create HTTP client: {msg}"))
            }
        }
    }
}

impl From<HistoryError> for CommandError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NoUser => {
                Self::new("NOT_SIGNED_IN", "Sign in to see your scan history")
            }
            HistoryError::Server { status, message } => Self::with_details(
                "HISTORY_SERVER_ERROR",
                message,
                serde_json::json!({ "status": status }),
            ),
            HistoryError::Timeout { .. } | HistoryError::Transport(_) => Self::new(
                "HISTORY_UNAVAILABLE",
                format!("Could not reach the history service: {err}"),
            ),
            HistoryError::Malformed(msg) => Self::new(
                "HISTORY_MALFORMED",
                format!("Unreadable history response: {msg}"),
            ),
        }
    }
}

impl From<PhishGuardError> for CommandError {
    fn from(err: PhishGuardError) -> Self {
        match err {
            PhishGuardError::Validation(msg) => Self::new("VALIDATION_ERROR", msg),
            PhishGuardError::Config(err) => err.into(),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", format!("Configuration error: {err}"))
    }
}
