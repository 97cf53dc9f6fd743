//! ranklab-ev library - Evaluation & Ranking service
//!
//! Scores classification submissions against the active answer key and
//! serves the leaderboard derived from all persisted submissions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use sqlx::SqlitePool;

pub mod answer_key;
pub mod api;
pub mod eval;
pub mod leaderboard;
pub mod ledger;

use answer_key::AnswerKeyStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// In-memory snapshot of the active answer key (copy-on-replace)
    pub answer_key: AnswerKeyStore,
    /// Per-participant evaluation locks, created on first use
    participant_locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            answer_key: AnswerKeyStore::new(),
            participant_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get (or create) the evaluation lock for one participant
    ///
    /// Holding this lock serializes the count-read / attempt-assign /
    /// insert sequence, keeping attempt numbers unique and gap-free under
    /// concurrent submissions from the same participant.
    pub fn participant_lock(&self, participant_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.participant_locks.lock().unwrap();
        locks
            .entry(participant_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/api/submissions", post(api::submit))
        .route("/api/leaderboard", get(api::get_leaderboard))
        .route(
            "/api/answer-key",
            put(api::replace_answer_key).get(api::get_answer_key),
        )
        .route("/api/participants", post(api::create_participant))
        .merge(api::health_routes())
        .with_state(state)
}
