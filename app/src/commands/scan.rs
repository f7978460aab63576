//! Scan submission and progress commands.

use crate::error::CommandError;
use crate::state::AppState;
use phishguard_scan::{LogStatus, SafetyLevel, ScanOutcome, ScanPhase, ScanReport};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Result of a scan as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    /// Correlation id
    pub scan_id: Uuid,
    /// The verdict
    pub outcome: ScanOutcome,
    /// History logging result, absent for anonymous scans
    pub log_status: Option<LogStatus>,
    /// Display band for the score
    pub safety_level: SafetyLevel,
    /// Advice matching the verdict
    pub recommendations: Vec<String>,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        let safety_level = report.outcome.safety_level();
        let recommendations = report
            .outcome
            .recommendations()
            .iter()
            .map(|r| (*r).to_string())
            .collect();

        Self {
            scan_id: report.scan_id,
            outcome: report.outcome,
            log_status: report.log_status,
            safety_level,
            recommendations,
        }
    }
}

/// Where the current submission is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatusResponse {
    /// Whether the submit control should be disabled
    pub submitting: bool,
    /// Current phase
    pub phase: ScanPhase,
    /// Progress percentage
    pub progress: u8,
}

/// Submit a URL for analysis.
///
/// Refuses to start while another submission is in flight.
pub async fn scan_url(state: &AppState, url: String) -> Result<ScanResponse, CommandError> {
    info!("scan_url: url={}", url);

    let report = state.coordinator.submit(&url).await?;
    Ok(report.into())
}

/// Current submission phase.
pub fn scan_status(state: &AppState) -> ScanStatusResponse {
    let phase = state.coordinator.phase();
    ScanStatusResponse {
        submitting: phase.is_active(),
        phase,
        progress: phase.progress(),
    }
}
