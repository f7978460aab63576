//! Shared types used across the PhishGuard client.
//!
//! This module defines validated newtypes for scan input and user identity,
//! plus the safety score scale used to turn analyzer scores into verdicts.

use crate::error::PhishGuardError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cheap format check for scan input (compiled once)
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://\S+$").expect("URL regex is hardcoded and valid"));

/// A URL accepted for scanning.
///
/// Only a cheap format check is performed: the trimmed input must start with
/// `http://` or `https://` and contain no whitespace. Deeper validation is the
/// analyzer's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScanUrl(String);

impl ScanUrl {
    /// Parse and validate a URL for scanning.
    ///
    /// # Errors
    /// Returns error if the input is empty, whitespace-only, or does not look
    /// like an absolute `http(s)` URL.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, PhishGuardError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PhishGuardError::Validation(
                "URL must not be empty".to_string(),
            ));
        }

        if URL_PATTERN.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(PhishGuardError::Validation(format!(
                "please enter a valid URL starting with http:// or https://, got '{trimmed}'"
            )))
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ScanUrl {
    type Error = PhishGuardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ScanUrl> for String {
    fn from(url: ScanUrl) -> Self {
        url.0
    }
}

impl fmt::Display for ScanUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the user a scan is logged for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new `Username`.
    ///
    /// # Errors
    /// Returns error if the name is empty after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, PhishGuardError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PhishGuardError::Validation(
                "username must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Safety score scale.
///
/// Scores run from 0 to 100 and higher means safer. A score strictly above
/// the threshold is considered safe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyScale {
    threshold: f64,
}

impl SafetyScale {
    /// Lowest possible score.
    pub const MIN_SCORE: f64 = 0.0;
    /// Highest possible score.
    pub const MAX_SCORE: f64 = 100.0;
    /// Default safe threshold.
    pub const DEFAULT_THRESHOLD: f64 = 70.0;

    /// Create a scale with a custom threshold.
    ///
    /// # Errors
    /// Returns error if the threshold is not a finite value within 0–100.
    pub fn new(threshold: f64) -> Result<Self, PhishGuardError> {
        if !threshold.is_finite() || !(Self::MIN_SCORE..=Self::MAX_SCORE).contains(&threshold) {
            return Err(PhishGuardError::Validation(format!(
                "safe threshold must be within 0-100, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    /// The configured threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether a score counts as safe.
    #[must_use]
    pub fn is_safe(&self, score: f64) -> bool {
        score > self.threshold
    }
}

impl Default for SafetyScale {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_url_valid() {
        let url = ScanUrl::parse("https://example.com/login").expect("valid url");
        assert_eq!(url.as_str(), "https://example.com/login");

        let url = ScanUrl::parse("  http://example.com  ").expect("valid url");
        assert_eq!(url.as_str(), "http://example.com");
    }

    #[test]
    fn test_scan_url_empty() {
        assert!(ScanUrl::parse("").is_err());
        assert!(ScanUrl::parse("   \t").is_err());
    }

    #[test]
    fn test_scan_url_invalid_format() {
        assert!(ScanUrl::parse("not-a-url").is_err());
        assert!(ScanUrl::parse("ftp://example.com").is_err());
        assert!(ScanUrl::parse("https://").is_err());
        assert!(ScanUrl::parse("https://exa mple.com").is_err());
    }

    #[test]
    fn test_scan_url_serde() {
        let url: ScanUrl = serde_json::from_str("\"https://example.com\"").expect("deserialize");
        assert_eq!(url.as_str(), "https://example.com");

        let err = serde_json::from_str::<ScanUrl>("\"example.com\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_username() {
        let name = Username::new(" alice ").expect("valid username");
        assert_eq!(name.as_str(), "alice");
        assert!(Username::new("  ").is_err());
    }

    #[test]
    fn test_safety_scale_default() {
        let scale = SafetyScale::default();
        assert!((scale.threshold() - 70.0).abs() < f64::EPSILON);
        assert!(scale.is_safe(80.0));
        assert!(!scale.is_safe(50.0));
        assert!(!scale.is_safe(70.0));
    }

    #[test]
    fn test_safety_scale_bounds() {
        assert!(SafetyScale::new(0.0).is_ok());
        assert!(SafetyScale::new(100.0).is_ok());
        assert!(SafetyScale::new(-1.0).is_err());
        assert!(SafetyScale::new(100.5).is_err());
        assert!(SafetyScale::new(f64::NAN).is_err());
    }
}
