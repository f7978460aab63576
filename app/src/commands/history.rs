//! History listing commands.

use crate::error::CommandError;
use crate::state::AppState;
use phishguard_scan::{HistoryEntry, HistoryQuery, HistorySummary, SortOrder};
use tracing::info;

/// The signed-in user's past scans, optionally filtered by URL.
pub async fn get_history(
    state: &AppState,
    search: Option<String>,
    order: SortOrder,
) -> Result<Vec<HistoryEntry>, CommandError> {
    info!("get_history: search={:?}, order={:?}", search, order);
    let query = HistoryQuery { search, order };
    Ok(state.history.entries(&query).await?)
}

/// Totals over the signed-in user's past scans.
pub async fn get_history_summary(state: &AppState) -> Result<HistorySummary, CommandError> {
    Ok(state.history.summary().await?)
}
