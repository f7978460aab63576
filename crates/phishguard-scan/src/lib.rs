//! PhishGuard Scan - URL submission and result reconciliation.
//!
//! This crate submits URLs to an external phishing analyzer, turns its answer
//! (or its failure) into a [`ScanOutcome`], and records that outcome in a
//! per-user history store without letting history failures affect the
//! verdict already produced.
//!
//! # Features
//!
//! - Cheap input check before any network call
//! - Optional analyzer retry with linear backoff (off by default)
//! - Degraded fallback outcome on analyzer failure, never an error
//! - History logging with its own bounded fixed-delay retry
//! - Observable submission phase for disabling re-submission in the UI
//! - History browsing with search, ordering and summary figures
//!
//! # Example
//!
//! ```rust,no_run
//! use phishguard_core::AppConfig;
//! use phishguard_scan::{HttpAnalyzer, HttpHistoryStore, ScanCoordinator, ScanSettings, StaticIdentity};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let coordinator = ScanCoordinator::new(
//!     Arc::new(HttpAnalyzer::from_config(&config.analyzer)?),
//!     Arc::new(HttpHistoryStore::from_config(&config.history)?),
//!     Arc::new(StaticIdentity::from_config(&config.general)),
//!     ScanSettings::from_config(&config),
//! );
//!
//! let report = coordinator.submit("https://example.com/login").await?;
//! println!("safe: {}, score: {}", report.outcome.safe, report.outcome.score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod analyzer;
pub mod browse;
pub mod coordinator;
pub mod error;
pub mod history;
pub mod http;
pub mod identity;
pub mod outcome;
pub mod retry;

// Re-export commonly used types
pub use analyzer::{Analyzer, AnalyzerVerdict, HttpAnalyzer};
pub use browse::{HistoryBrowser, HistoryQuery, HistorySummary, SortOrder};
pub use coordinator::{ScanCoordinator, ScanPhase, ScanSettings};
pub use error::{AnalyzeError, HistoryError, Result, ScanError};
pub use history::{HistoryEntry, HistoryStore, HttpHistoryStore, LogReply};
pub use identity::{IdentityProvider, SessionIdentity, StaticIdentity};
pub use outcome::{LogRecord, LogStatus, SafetyLevel, ScanOutcome, ScanReport, FALLBACK_THREAT};
pub use retry::{Backoff, RetryPolicy};
