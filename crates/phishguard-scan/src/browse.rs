//! Browsing and summarising a user's scan history.

use crate::error::HistoryError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::identity::IdentityProvider;
use chrono::{DateTime, FixedOffset};
use phishguard_core::SafetyScale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sort order for history listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recent first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
}

/// Search and ordering applied to a history listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Case-insensitive URL substring
    pub search: Option<String>,
    /// Sort order
    #[serde(default)]
    pub order: SortOrder,
}

impl HistoryQuery {
    /// Filter and sort entries.
    ///
    /// Entries with unparseable timestamps sort as the oldest.
    #[must_use]
    pub fn apply(&self, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<HistoryEntry> = entries
            .into_iter()
            .filter(|entry| {
                needle
                    .as_deref()
                    .map_or(true, |n| entry.url.to_lowercase().contains(n))
            })
            .collect();

        matched.sort_by_key(|entry| parse_timestamp(&entry.timestamp));
        if self.order == SortOrder::Newest {
            matched.reverse();
        }
        matched
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Aggregate figures over a history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Number of scans
    pub total: usize,
    /// Scans judged safe
    pub safe: usize,
    /// Scans judged unsafe
    pub unsafe_count: usize,
    /// Mean score, absent when there are no scans
    pub average_score: Option<f64>,
}

impl HistorySummary {
    /// Summarise entries using `scale` where no verdict was recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_entries(entries: &[HistoryEntry], scale: &SafetyScale) -> Self {
        let total = entries.len();
        let safe = entries.iter().filter(|e| e.is_safe(scale)).count();
        let average_score = if total == 0 {
            None
        } else {
            Some(entries.iter().map(|e| e.score).sum::<f64>() / total as f64)
        };

        Self {
            total,
            safe,
            unsafe_count: total - safe,
            average_score,
        }
    }
}

/// Reads the signed-in user's history.
pub struct HistoryBrowser {
    history: Arc<dyn HistoryStore>,
    identity: Arc<dyn IdentityProvider>,
    scale: SafetyScale,
    limit: u32,
}

impl HistoryBrowser {
    /// Create a browser returning at most `limit` entries.
    #[must_use]
    pub fn new(
        history: Arc<dyn HistoryStore>,
        identity: Arc<dyn IdentityProvider>,
        scale: SafetyScale,
        limit: u32,
    ) -> Self {
        Self {
            history,
            identity,
            scale,
            limit,
        }
    }

    /// The signed-in user's entries, filtered and sorted.
    ///
    /// # Errors
    /// Returns `HistoryError::NoUser` if nobody is signed in, or the store's error.
    pub async fn entries(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, HistoryError> {
        let user = self.identity.current_user().ok_or(HistoryError::NoUser)?;
        let entries = self.history.fetch_history(&user, self.limit).await?;
        tracing::debug!("Fetched {} history entries for {}", entries.len(), user);
        Ok(query.apply(entries))
    }

    /// Summary over all of the signed-in user's entries.
    ///
    /// # Errors
    /// Returns `HistoryError::NoUser` if nobody is signed in, or the store's error.
    pub async fn summary(&self) -> Result<HistorySummary, HistoryError> {
        let entries = self.entries(&HistoryQuery::default()).await?;
        Ok(HistorySummary::from_entries(&entries, &self.scale))
    }
}
