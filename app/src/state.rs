//! Application state management.

use phishguard_core::{AppConfig, Username};
use phishguard_scan::{
    Analyzer, HistoryBrowser, HistoryStore, HttpAnalyzer, HttpHistoryStore, ScanCoordinator,
    ScanError, ScanSettings, SessionIdentity,
};
use std::sync::Arc;

/// State shared across all commands.
pub struct AppState {
    /// Loaded configuration
    pub config: AppConfig,
    /// Scan workflow
    pub coordinator: Arc<ScanCoordinator>,
    /// History listings for the signed-in user
    pub history: HistoryBrowser,
    /// Who scans are logged for
    pub session: Arc<SessionIdentity>,
}

impl AppState {
    /// Build state talking to the configured HTTP services.
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be created.
    pub fn new(config: AppConfig) -> Result<Self, ScanError> {
        let analyzer = Arc::new(HttpAnalyzer::from_config(&config.analyzer)?);
        let history = Arc::new(HttpHistoryStore::from_config(&config.history)?);
        tracing::info!(
            "Analyzer at {}, history at {}",
            analyzer.endpoint(),
            history.log_endpoint()
        );
        Ok(Self::with_components(config, analyzer, history))
    }

    /// Build state around the given collaborators.
    pub fn with_components(
        config: AppConfig,
        analyzer: Arc<dyn Analyzer>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let session = Arc::new(SessionIdentity::new());
        if let Some(user) = config
            .general
            .username
            .as_deref()
            .and_then(|name| Username::new(name).ok())
        {
            session.sign_in(user);
        }

        let settings = ScanSettings::from_config(&config);
        let coordinator = Arc::new(ScanCoordinator::new(
            analyzer,
            history.clone(),
            session.clone(),
            settings,
        ));
        let browser = HistoryBrowser::new(
            history,
            session.clone(),
            settings.scale,
            config.history.history_limit,
        );

        Self {
            config,
            coordinator,
            history: browser,
            session,
        }
    }
}
