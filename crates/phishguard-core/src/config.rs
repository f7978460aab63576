//! Configuration management for PhishGuard.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::SafetyScale;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/phishguard/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General application settings
    pub general: GeneralConfig,
    /// Analyzer service settings
    pub analyzer: AnalyzerConfig,
    /// History store settings
    pub history: HistoryConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PHISHGUARD_ANALYZER_URL`: Override the analyzer base URL
    /// - `PHISHGUARD_HISTORY_URL`: Override the history store base URL
    /// - `PHISHGUARD_MAX_NETWORK_RETRIES`: Override analyzer retry count
    /// - `PHISHGUARD_USER`: Set the user scans are logged for
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Unparseable numeric values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PHISHGUARD_ANALYZER_URL") {
            tracing::debug!("Override analyzer.base_url from env: {}", url);
            self.analyzer.base_url = url;
        }

        if let Some(url) = lookup("PHISHGUARD_HISTORY_URL") {
            tracing::debug!("Override history.base_url from env: {}", url);
            self.history.base_url = url;
        }

        if let Some(val) = lookup("PHISHGUARD_MAX_NETWORK_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.analyzer.max_network_retries = retries;
                tracing::debug!("Override analyzer.max_network_retries from env: {}", retries);
            }
        }

        if let Some(user) = lookup("PHISHGUARD_USER") {
            let user = user.trim().to_string();
            if !user.is_empty() {
                tracing::debug!("Override general.username from env");
                self.general.username = Some(user);
            }
        }
    }

    /// Check that values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.analyzer.base_url.trim().is_empty() {
            return Err(invalid("analyzer.base_url", "must not be empty"));
        }
        if self.history.base_url.trim().is_empty() {
            return Err(invalid("history.base_url", "must not be empty"));
        }
        if self.history.log_max_attempts == 0 {
            return Err(invalid("history.log_max_attempts", "must be at least 1"));
        }
        if self.analyzer.timeout_secs == 0 {
            return Err(invalid("analyzer.timeout_secs", "must be at least 1"));
        }
        if self.history.timeout_secs == 0 {
            return Err(invalid("history.timeout_secs", "must be at least 1"));
        }
        SafetyScale::new(self.analyzer.safe_threshold)
            .map_err(|e| invalid("analyzer.safe_threshold", &e.to_string()))?;
        Ok(())
    }

    /// The safety scale described by this configuration.
    ///
    /// Falls back to the default scale when the threshold is out of range;
    /// [`AppConfig::validate`] reports that case as an error.
    #[must_use]
    pub fn safety_scale(&self) -> SafetyScale {
        SafetyScale::new(self.analyzer.safe_threshold).unwrap_or_default()
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/phishguard/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "phishguard", "phishguard").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// User that scans are logged for; scans are not logged when unset
    pub username: Option<String>,
}

/// Analyzer service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Analyzer base URL
    pub base_url: String,
    /// Path of the scan endpoint
    pub scan_path: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Extra analyze attempts after a transport failure (0 = no retry)
    pub max_network_retries: u32,
    /// Linear backoff step between analyze attempts in milliseconds
    pub retry_backoff_ms: u64,
    /// Scores strictly above this value (0-100) are safe
    pub safe_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            scan_path: "/api/scan-url".to_string(),
            timeout_secs: 15,
            max_network_retries: 0,
            retry_backoff_ms: 2000,
            safe_threshold: SafetyScale::DEFAULT_THRESHOLD,
        }
    }
}

/// History store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// History store base URL
    pub base_url: String,
    /// Path of the log endpoint
    pub log_path: String,
    /// Path of the history listing endpoint
    pub history_path: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Total log attempts, including the first
    pub log_max_attempts: u32,
    /// Fixed delay between log attempts in milliseconds
    pub log_retry_delay_ms: u64,
    /// Maximum number of history entries to fetch
    pub history_limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            log_path: "/api/log-scan".to_string(),
            history_path: "/api/scan-history".to_string(),
            timeout_secs: 10,
            log_max_attempts: 3,
            log_retry_delay_ms: 300,
            history_limit: 50,
        }
    }
}
