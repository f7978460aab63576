//! Scan coordinator for submitting URLs and recording their outcomes.
//!
//! The `ScanCoordinator` runs one submission end to end: a cheap input check,
//! the analyzer call with an optional linear-backoff retry, and a best-effort
//! history log with its own fixed-delay retry. Analyzer and history failures
//! are converted to values so the caller always has an outcome to render.

use crate::analyzer::{Analyzer, AnalyzerVerdict};
use crate::error::{AnalyzeError, Result, ScanError};
use crate::history::HistoryStore;
use crate::identity::IdentityProvider;
use crate::outcome::{LogRecord, LogStatus, ScanOutcome, ScanReport};
use crate::retry::RetryPolicy;
use chrono::Utc;
use phishguard_core::{AppConfig, SafetyScale, ScanUrl};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

/// Default number of history log attempts.
pub const LOG_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between history log attempts.
pub const LOG_RETRY_DELAY_MS: u64 = 300;

/// Default linear backoff step between analyzer attempts.
pub const ANALYZE_BACKOFF_MS: u64 = 2000;

/// Where a submission currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    /// Nothing in flight
    Idle,
    /// Input accepted, about to call the analyzer
    Preparing,
    /// Waiting for the analyzer
    Analyzing,
    /// Outcome known, recording it in history
    Logging,
}

impl ScanPhase {
    /// Progress percentage for display.
    #[must_use]
    pub fn progress(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Preparing => 30,
            Self::Analyzing => 70,
            Self::Logging => 90,
        }
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }
}

/// Tunables for the scan workflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    /// Safe/unsafe threshold
    pub scale: SafetyScale,
    /// Retry policy for the analyzer call
    pub analyze_retry: RetryPolicy,
    /// Retry policy for the history log call
    pub log_retry: RetryPolicy,
}

impl ScanSettings {
    /// Settings described by the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scale: config.safety_scale(),
            analyze_retry: RetryPolicy::linear(
                config.analyzer.max_network_retries.saturating_add(1),
                Duration::from_millis(config.analyzer.retry_backoff_ms),
            ),
            log_retry: RetryPolicy::fixed(
                config.history.log_max_attempts,
                Duration::from_millis(config.history.log_retry_delay_ms),
            ),
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            scale: SafetyScale::default(),
            analyze_retry: RetryPolicy::linear(1, Duration::from_millis(ANALYZE_BACKOFF_MS)),
            log_retry: RetryPolicy::fixed(
                LOG_MAX_ATTEMPTS,
                Duration::from_millis(LOG_RETRY_DELAY_MS),
            ),
        }
    }
}

/// Resets the phase to `Idle` when dropped, on every exit path.
struct SubmittingGuard<'a> {
    phase: &'a watch::Sender<ScanPhase>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(ScanPhase::Idle);
    }
}

/// Coordinates analysis and history logging for submitted URLs.
pub struct ScanCoordinator {
    analyzer: Arc<dyn Analyzer>,
    history: Arc<dyn HistoryStore>,
    identity: Arc<dyn IdentityProvider>,
    settings: ScanSettings,
    phase: watch::Sender<ScanPhase>,
}

impl ScanCoordinator {
    /// Create a new coordinator.
    #[must_use]
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        history: Arc<dyn HistoryStore>,
        identity: Arc<dyn IdentityProvider>,
        settings: ScanSettings,
    ) -> Self {
        let (phase, _) = watch::channel(ScanPhase::Idle);
        Self {
            analyzer,
            history,
            identity,
            settings,
            phase,
        }
    }

    /// The settings in use.
    #[must_use]
    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ScanPhase {
        *self.phase.borrow()
    }

    /// Whether a submission is in flight.
    ///
    /// `submit` refuses to start while this is true.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.phase().is_active()
    }

    /// Watch phase changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ScanPhase> {
        self.phase.subscribe()
    }

    /// Submit a URL for analysis and record the outcome.
    ///
    /// Analyzer failures produce a degraded outcome and history failures a
    /// failed log status; neither is returned as an error.
    ///
    /// # Errors
    /// Returns `ScanError::InvalidInput` if the URL is empty or not an
    /// `http(s)` URL, and `ScanError::InProgress` if another submission holds
    /// the coordinator. No network call is made in either case.
    pub async fn submit(&self, url: &str) -> Result<ScanReport> {
        let url = ScanUrl::parse(url).map_err(|e| ScanError::InvalidInput(e.to_string()))?;

        let _guard = self.try_enter().ok_or(ScanError::InProgress)?;
        let scan_id = Uuid::new_v4();
        tracing::info!(%scan_id, url = %url, "Submitting URL for analysis");

        self.phase.send_replace(ScanPhase::Analyzing);
        let outcome = match self.analyze_with_retry(&url).await {
            Ok(verdict) => ScanOutcome::from_verdict(&url, verdict, &self.settings.scale, Utc::now()),
            Err(e) => {
                tracing::warn!(%scan_id, "Analysis failed, reporting degraded outcome: {}", e);
                ScanOutcome::degraded(&url, &e, Utc::now())
            }
        };
        tracing::info!(
            %scan_id,
            score = outcome.score,
            safe = outcome.safe,
            degraded = outcome.degraded,
            "Scan outcome ready"
        );

        let log_status = match self.identity.current_user() {
            Some(user) => {
                self.phase.send_replace(ScanPhase::Logging);
                let record = LogRecord::new(&user, &outcome);
                Some(self.log_with_retry(&record).await)
            }
            None => {
                tracing::debug!(%scan_id, "No user signed in, not logging scan");
                None
            }
        };

        Ok(ScanReport {
            scan_id,
            outcome,
            log_status,
        })
    }

    /// Move from `Idle` to `Preparing` in one step, or `None` if busy.
    fn try_enter(&self) -> Option<SubmittingGuard<'_>> {
        let claimed = self.phase.send_if_modified(|phase| {
            if *phase == ScanPhase::Idle {
                *phase = ScanPhase::Preparing;
                true
            } else {
                false
            }
        });
        if claimed {
            Some(SubmittingGuard { phase: &self.phase })
        } else {
            None
        }
    }

    /// Call the analyzer, retrying transport failures with linear backoff.
    ///
    /// Server responses, including error statuses, end the loop immediately.
    async fn analyze_with_retry(
        &self,
        url: &ScanUrl,
    ) -> std::result::Result<AnalyzerVerdict, AnalyzeError> {
        let policy = self.settings.analyze_retry;
        let max_attempts = policy.max_attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.analyzer.analyze(url).await {
                Ok(verdict) => return Ok(verdict),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    if attempt < max_attempts {
                        let delay = policy.delay_for(attempt);
                        tracing::warn!(
                            "Analyzer call failed for {} (attempt {}/{}), retrying in {:?}: {}",
                            url,
                            attempt,
                            max_attempts,
                            delay,
                            e
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AnalyzeError::Transport("no analyzer attempt was made".to_string())))
    }

    /// Log a record, retrying transport failures after a fixed delay.
    ///
    /// Any reply from the store ends the loop with its message.
    async fn log_with_retry(&self, record: &LogRecord) -> LogStatus {
        let policy = self.settings.log_retry;
        let max_attempts = policy.max_attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.history.log_scan(record).await {
                Ok(reply) if reply.accepted => {
                    tracing::info!("Scan of {} logged for {}", record.url, record.username);
                    return LogStatus::success(reply.message);
                }
                Ok(reply) => {
                    tracing::warn!("History store rejected scan of {}: {}", record.url, reply.message);
                    return LogStatus::failure(reply.message);
                }
                Err(e) if !e.is_transient() => {
                    tracing::warn!("Failed to log scan of {}: {}", record.url, e);
                    return LogStatus::failure(format!("Failed to log scan: {e}"));
                }
                Err(e) => {
                    if attempt < max_attempts {
                        let delay = policy.delay_for(attempt);
                        tracing::warn!(
                            "Log call failed (attempt {}/{}), retrying in {:?}: {}",
                            attempt,
                            max_attempts,
                            delay,
                            e
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error.map_or_else(|| "unknown error".to_string(), |e| e.to_string());
        tracing::warn!(
            "Giving up logging scan of {} after {} attempts: {}",
            record.url,
            max_attempts,
            reason
        );
        LogStatus::failure(format!(
            "Failed to log scan after {max_attempts} attempts: {reason}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_progress() {
        assert_eq!(ScanPhase::Idle.progress(), 0);
        assert_eq!(ScanPhase::Preparing.progress(), 30);
        assert_eq!(ScanPhase::Analyzing.progress(), 70);
        assert_eq!(ScanPhase::Logging.progress(), 90);
        assert!(!ScanPhase::Idle.is_active());
        assert!(ScanPhase::Logging.is_active());
    }

    #[test]
    fn test_default_settings() {
        let settings = ScanSettings::default();
        assert_eq!(settings.analyze_retry.max_attempts(), 1);
        assert_eq!(settings.log_retry.max_attempts(), 3);
        assert_eq!(
            settings.log_retry.delay_for(2),
            Duration::from_millis(LOG_RETRY_DELAY_MS)
        );
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = AppConfig::default();
        config.analyzer.max_network_retries = 2;
        config.analyzer.retry_backoff_ms = 100;
        config.history.log_max_attempts = 5;

        let settings = ScanSettings::from_config(&config);
        assert_eq!(settings.analyze_retry.max_attempts(), 3);
        assert_eq!(settings.analyze_retry.delay_for(2), Duration::from_millis(200));
        assert_eq!(settings.log_retry.max_attempts(), 5);
        assert_eq!(settings.log_retry.delay_for(4), Duration::from_millis(300));
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&ScanPhase::Analyzing).expect("serialize phase");
        assert_eq!(json, "\"analyzing\"");
    }
}
