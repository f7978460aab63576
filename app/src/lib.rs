//! PhishGuard application shell.
//!
//! Wires configuration, the HTTP-backed collaborators and the command
//! handlers together. Scan logic lives in the `crates/` directory.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;
pub mod error;
pub mod state;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use phishguard_core::AppConfig;
use phishguard_scan::SortOrder;
use serde::Serialize;
use state::AppState;
use tracing::info;

/// Command line interface.
#[derive(Debug, Parser)]
#[command(name = "phishguard")]
#[command(about = "Check URLs for phishing and browse your scan history")]
#[command(version)]
pub struct Cli {
    /// Sign in as this user for the invocation (overrides config)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a URL
    Scan {
        /// URL to check (http or https)
        url: String,
    },

    /// List past scans
    History {
        /// Only show URLs containing this text
        search: Option<String>,
        /// Oldest first
        #[arg(long)]
        oldest: bool,
    },

    /// Totals over past scans
    Summary,
}

/// Initialize tracing subscriber for logging.
///
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,phishguard=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Run one CLI invocation.
pub async fn run(cli: Cli) -> Result<()> {
    info!("Starting PhishGuard v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env().context("Failed to load configuration")?;
    let state = AppState::new(config).context("Failed to initialize application state")?;

    if let Some(user) = cli.user.as_deref() {
        commands::session::sign_in(&state, user)?;
    }

    match cli.command {
        Commands::Scan { url } => {
            let response = commands::scan::scan_url(&state, url).await?;
            output(&response)
        }
        Commands::History { search, oldest } => {
            let order = if oldest {
                SortOrder::Oldest
            } else {
                SortOrder::Newest
            };
            let entries = commands::history::get_history(&state, search, order).await?;
            output(&entries)
        }
        Commands::Summary => {
            let summary = commands::history::get_history_summary(&state).await?;
            output(&summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan() {
        let cli = Cli::try_parse_from(["phishguard", "scan", "https://example.com"])
            .expect("parse args");
        assert!(cli.user.is_none());
        match cli.command {
            Commands::Scan { url } => assert_eq!(url, "https://example.com"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_history_with_user() {
        let cli = Cli::try_parse_from(["phishguard", "history", "login", "--oldest", "--user", "alice"])
            .expect("parse args");
        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Commands::History { search, oldest } => {
                assert_eq!(search.as_deref(), Some("login"));
                assert!(oldest);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_scan_requires_url() {
        assert!(Cli::try_parse_from(["phishguard", "scan"]).is_err());
    }
}
