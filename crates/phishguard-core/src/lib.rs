//! PhishGuard Core - Foundation crate for the PhishGuard client.
//!
//! This crate provides shared types, error handling and configuration
//! management that the scan workflow and the application shell depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`ScanUrl`, `Username`) and the safety score scale
//!
//! # Example
//!
//! ```rust
//! use phishguard_core::{AppConfig, ScanUrl};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.analyzer.safe_threshold, 70.0);
//!
//! let url = ScanUrl::parse("https://example.com/login")?;
//! println!("Scanning {url}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AnalyzerConfig, AppConfig, GeneralConfig, HistoryConfig};
pub use error::{ConfigError, ConfigResult, PhishGuardError, Result};
pub use types::{SafetyScale, ScanUrl, Username};
