//! Command-level tests against mocked analyzer and history services.

use async_trait::async_trait;
use phishguard_app::commands::{history, scan, session};
use phishguard_app::state::AppState;
use phishguard_core::{AppConfig, ScanUrl, Username};
use phishguard_scan::{
    AnalyzeError, Analyzer, AnalyzerVerdict, HistoryEntry, HistoryError, HistoryStore, LogRecord,
    LogReply, SafetyLevel, ScanPhase, SortOrder, FALLBACK_THREAT,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

struct MockAnalyzer {
    answer: Result<AnalyzerVerdict, AnalyzeError>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, _url: &ScanUrl) -> Result<AnalyzerVerdict, AnalyzeError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.answer.clone()
    }
}

#[derive(Default)]
struct MockHistory {
    logged: Mutex<Vec<LogRecord>>,
    entries: Vec<HistoryEntry>,
}

#[async_trait]
impl HistoryStore for MockHistory {
    async fn log_scan(&self, record: &LogRecord) -> Result<LogReply, HistoryError> {
        self.logged.lock().unwrap().push(record.clone());
        Ok(LogReply {
            accepted: true,
            message: "Scan logged".to_string(),
        })
    }

    async fn fetch_history(
        &self,
        _username: &Username,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.iter().take(limit as usize).cloned().collect())
    }
}

fn scoring(score: f64) -> Arc<MockAnalyzer> {
    Arc::new(MockAnalyzer {
        answer: Ok(AnalyzerVerdict {
            score,
            threats: vec!["Suspicious domain".to_string()],
        }),
        gate: None,
    })
}

fn entry(url: &str, score: f64, timestamp: &str) -> HistoryEntry {
    HistoryEntry {
        url: url.to_string(),
        score,
        safe: None,
        threats: Vec::new(),
        timestamp: timestamp.to_string(),
    }
}

fn config_for(user: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.general.username = user.map(ToString::to_string);
    config
}

#[tokio::test]
async fn test_scan_url_safe_and_logged() {
    let store = Arc::new(MockHistory::default());
    let state = AppState::with_components(config_for(Some("alice")), scoring(92.0), store.clone());

    let response = scan::scan_url(&state, "https://legitimatebank.com/login".to_string())
        .await
        .unwrap();

    assert!(response.outcome.safe);
    assert!(response.outcome.threats.is_empty());
    assert_eq!(response.safety_level, SafetyLevel::High);
    assert!(!response.recommendations.is_empty());

    let log_status = response.log_status.unwrap();
    assert!(!log_status.is_error);

    let logged = store.logged.lock().unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].username, "alice");
}

#[tokio::test]
async fn test_scan_url_anonymous_not_logged() {
    let store = Arc::new(MockHistory::default());
    let state = AppState::with_components(config_for(None), scoring(12.0), store.clone());

    let response = scan::scan_url(&state, "https://phishing-example.com/login".to_string())
        .await
        .unwrap();

    assert!(!response.outcome.safe);
    assert_eq!(response.outcome.threats, vec!["Suspicious domain".to_string()]);
    assert_eq!(response.safety_level, SafetyLevel::Low);
    assert!(response.log_status.is_none());
    assert!(store.logged.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_scan_url_invalid_input() {
    let state = AppState::with_components(
        config_for(None),
        scoring(92.0),
        Arc::new(MockHistory::default()),
    );

    let err = scan::scan_url(&state, "not a url".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, "INVALID_URL");

    let err = scan::scan_url(&state, "   ".to_string()).await.unwrap_err();
    assert_eq!(err.code, "INVALID_URL");
}

#[tokio::test]
async fn test_scan_url_degraded_when_analyzer_down() {
    let analyzer = Arc::new(MockAnalyzer {
        answer: Err(AnalyzeError::Transport("connection refused".to_string())),
        gate: None,
    });
    let state = AppState::with_components(
        config_for(None),
        analyzer,
        Arc::new(MockHistory::default()),
    );

    let response = scan::scan_url(&state, "https://example.com".to_string())
        .await
        .unwrap();

    assert!(response.outcome.degraded);
    assert!(!response.outcome.safe);
    assert_eq!(response.outcome.threats[0], FALLBACK_THREAT);
}

#[tokio::test]
async fn test_second_scan_refused_while_first_in_flight() {
    let gate = Arc::new(Notify::new());
    let analyzer = Arc::new(MockAnalyzer {
        answer: Ok(AnalyzerVerdict {
            score: 80.0,
            threats: Vec::new(),
        }),
        gate: Some(gate.clone()),
    });
    let state = Arc::new(AppState::with_components(
        config_for(None),
        analyzer,
        Arc::new(MockHistory::default()),
    ));

    let mut phases = state.coordinator.subscribe();
    let first = {
        let state = state.clone();
        tokio::spawn(async move { scan::scan_url(&state, "https://a.example.com".to_string()).await })
    };
    phases.wait_for(|phase| *phase == ScanPhase::Analyzing).await.unwrap();

    let status = scan::scan_status(&state);
    assert!(status.submitting);
    assert_eq!(status.phase, ScanPhase::Analyzing);
    assert_eq!(status.progress, 70);

    let err = scan::scan_url(&state, "https://b.example.com".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, "SCAN_IN_PROGRESS");

    gate.notify_one();
    let response = first.await.unwrap().unwrap();
    assert_eq!(response.outcome.url, "https://a.example.com");

    let status = scan::scan_status(&state);
    assert!(!status.submitting);
    assert_eq!(status.progress, 0);
}

#[tokio::test]
async fn test_history_requires_sign_in() {
    let state = AppState::with_components(
        config_for(None),
        scoring(92.0),
        Arc::new(MockHistory::default()),
    );

    let err = history::get_history(&state, None, SortOrder::Newest)
        .await
        .unwrap_err();
    assert_eq!(err.code, "NOT_SIGNED_IN");

    let err = history::get_history_summary(&state).await.unwrap_err();
    assert_eq!(err.code, "NOT_SIGNED_IN");
}

#[tokio::test]
async fn test_history_search_and_summary() {
    let store = Arc::new(MockHistory {
        logged: Mutex::new(Vec::new()),
        entries: vec![
            entry("https://legitimatebank.com/login", 92.0, "2025-05-15T10:23:45Z"),
            entry("https://phishing-example.com/login", 12.0, "2025-05-14T22:15:30Z"),
            entry("https://shopping.example.com/products", 95.0, "2025-05-14T16:45:20Z"),
        ],
    });
    let state = AppState::with_components(config_for(Some("alice")), scoring(92.0), store);

    let found = history::get_history(&state, Some("login".to_string()), SortOrder::Oldest)
        .await
        .unwrap();
    let urls: Vec<_> = found.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://phishing-example.com/login",
            "https://legitimatebank.com/login",
        ]
    );

    let summary = history::get_history_summary(&state).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.safe, 2);
    assert_eq!(summary.unsafe_count, 1);
}

#[tokio::test]
async fn test_sign_in_enables_logging() {
    let store = Arc::new(MockHistory::default());
    let state = AppState::with_components(config_for(None), scoring(75.0), store.clone());

    assert!(session::current_user(&state).is_none());
    assert_eq!(session::sign_in(&state, "  bob ").unwrap(), "bob");
    assert_eq!(session::current_user(&state).as_deref(), Some("bob"));

    let response = scan::scan_url(&state, "https://example.com".to_string())
        .await
        .unwrap();
    assert!(response.log_status.is_some());
    assert_eq!(store.logged.lock().unwrap()[0].username, "bob");

    session::sign_out(&state);
    assert!(session::current_user(&state).is_none());

    let err = session::sign_in(&state, "   ").unwrap_err();
    assert_eq!(err.code, "VALIDATION_ERROR");
}
