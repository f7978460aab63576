//! Error types for the scan workflow.
//!
//! Only [`ScanError`] ever leaves [`crate::ScanCoordinator::submit`]. Analyzer
//! and history failures are turned into values (a degraded outcome or a log
//! status) by the coordinator.

use thiserror::Error;

/// Errors returned to the caller of the scan workflow.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The URL was rejected before any network call was made
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Another submission is still in flight
    #[error("a scan is already in progress")]
    InProgress,

    /// An HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Errors from a single analyzer call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    /// No response within the client timeout
    #[error("analyzer request timed out after {seconds}s")]
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
    },

    /// Connection or transport failure, no response received
    #[error("analyzer transport error: {0}")]
    Transport(String),

    /// The analyzer answered with a non-2xx status
    #[error("analyzer error: status {status}{}", detail_suffix(.detail))]
    Server {
        /// HTTP status code
        status: u16,
        /// Human-readable `detail`/`message` from the error body, if any
        detail: Option<String>,
    },

    /// The analyzer answered 2xx with a body that is not a verdict
    #[error("malformed analyzer response: {0}")]
    Malformed(String),
}

impl AnalyzeError {
    /// Whether another attempt might succeed.
    ///
    /// Only failures without a server response are transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }

    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout { .. } => "The request timed out. Please try again.".to_string(),
            Self::Transport(_) => {
                "Network error. Please check your internet connection and try again.".to_string()
            }
            Self::Server { status: 400, detail } => detail
                .clone()
                .unwrap_or_else(|| "Invalid URL format. Please check and try again.".to_string()),
            Self::Server { status: 404, .. } => {
                "The scanning service is currently unavailable. Please try again later."
                    .to_string()
            }
            Self::Server { status, .. } if *status >= 500 => {
                "An error occurred while analyzing the URL. Please try again later.".to_string()
            }
            Self::Server { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| "Failed to analyze URL".to_string()),
            Self::Malformed(_) => {
                "The scanning service returned an unreadable response.".to_string()
            }
        }
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: timeout_secs,
            }
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(", {d}")).unwrap_or_default()
}

/// Errors from the history store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// No response within the client timeout
    #[error("history request timed out after {seconds}s")]
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
    },

    /// Connection or transport failure, no response received
    #[error("history transport error: {0}")]
    Transport(String),

    /// The history store answered with a non-2xx status
    #[error("history store error: status {status}, {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// The history store answered with an unreadable body
    #[error("malformed history response: {0}")]
    Malformed(String),

    /// History was requested without a signed-in user
    #[error("no user is signed in")]
    NoUser,
}

impl HistoryError {
    /// Whether another attempt might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: timeout_secs,
            }
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
