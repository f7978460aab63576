//! Scan outcome, log record and log status types.

use crate::analyzer::AnalyzerVerdict;
use crate::error::AnalyzeError;
use chrono::{DateTime, SecondsFormat, Utc};
use phishguard_core::{SafetyScale, ScanUrl, Username};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First threat entry of every degraded outcome.
pub const FALLBACK_THREAT: &str = "Server error or threat undetected";

/// Client-side record of one scan's result.
///
/// Only ever built once the analyzer call has resolved, either from its
/// verdict or as a degraded fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// The scanned URL
    pub url: String,
    /// Safety score, 0-100, higher is safer
    pub score: f64,
    /// Whether the score is above the safe threshold
    pub safe: bool,
    /// Findings; always empty when `safe` is true
    pub threats: Vec<String>,
    /// Completion time (RFC 3339, UTC), set by the client
    pub timestamp: String,
    /// Set when the analyzer failed and this is the local fallback
    #[serde(default)]
    pub degraded: bool,
}

impl ScanOutcome {
    /// Build an outcome from an analyzer verdict.
    #[must_use]
    pub fn from_verdict(
        url: &ScanUrl,
        verdict: AnalyzerVerdict,
        scale: &SafetyScale,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let safe = scale.is_safe(verdict.score);
        Self {
            url: url.as_str().to_string(),
            score: verdict.score,
            safe,
            threats: if safe { Vec::new() } else { verdict.threats },
            timestamp: format_timestamp(completed_at),
            degraded: false,
        }
    }

    /// Build the fallback outcome for a failed analyzer call.
    #[must_use]
    pub fn degraded(url: &ScanUrl, error: &AnalyzeError, completed_at: DateTime<Utc>) -> Self {
        Self {
            url: url.as_str().to_string(),
            score: 0.0,
            safe: false,
            threats: vec![FALLBACK_THREAT.to_string(), error.user_message()],
            timestamp: format_timestamp(completed_at),
            degraded: true,
        }
    }

    /// Display band for the score.
    #[must_use]
    pub fn safety_level(&self) -> SafetyLevel {
        SafetyLevel::from_score(self.score)
    }

    /// Advice for the user, chosen by verdict.
    #[must_use]
    pub fn recommendations(&self) -> &'static [&'static str] {
        if !self.safe {
            UNSAFE_RECOMMENDATIONS
        } else if self.safety_level() == SafetyLevel::High {
            SAFE_RECOMMENDATIONS
        } else {
            SUSPICIOUS_RECOMMENDATIONS
        }
    }
}

const UNSAFE_RECOMMENDATIONS: &[&str] = &[
    "Do not enter any personal information on this website",
    "Do not click on any links or download files",
    "Report this URL to your organization's IT security team",
];

const SUSPICIOUS_RECOMMENDATIONS: &[&str] = &[
    "Exercise caution when entering personal information",
    "Verify the website's authenticity through official channels",
    "Use two-factor authentication if available",
];

const SAFE_RECOMMENDATIONS: &[&str] = &[
    "The website appears to be safe",
    "Still, always be cautious with personal information",
    "Keep your browser and security software up to date",
];

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Display band for a safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    /// Score of 80 or more
    High,
    /// Score of 60 or more
    Medium,
    /// Anything lower
    Low,
}

impl SafetyLevel {
    /// Band a score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::High
        } else if score >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// An outcome plus the user it is logged for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// User the scan belongs to
    pub username: String,
    /// The scanned URL
    pub url: String,
    /// Safety score
    pub score: f64,
    /// Verdict
    pub safe: bool,
    /// Findings
    pub threats: Vec<String>,
    /// Outcome timestamp
    pub timestamp: String,
}

impl LogRecord {
    /// Build the record for an outcome.
    #[must_use]
    pub fn new(username: &Username, outcome: &ScanOutcome) -> Self {
        Self {
            username: username.as_str().to_string(),
            url: outcome.url.clone(),
            score: outcome.score,
            safe: outcome.safe,
            threats: outcome.threats.clone(),
            timestamp: outcome.timestamp.clone(),
        }
    }
}

/// Whether the outcome was recorded in the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStatus {
    /// Message for the user
    pub text: String,
    /// Whether logging failed
    pub is_error: bool,
}

impl LogStatus {
    /// A successful log.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// A failed log.
    #[must_use]
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Everything one `submit` produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Correlation id for this submission
    pub scan_id: Uuid,
    /// The verdict
    pub outcome: ScanOutcome,
    /// Logging result; `None` when no user is signed in
    pub log_status: Option<LogStatus>,
}
