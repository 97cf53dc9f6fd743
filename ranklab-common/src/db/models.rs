//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participant {
    pub guid: String,
    pub display_name: String,
    pub quota_override: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Metadata for one stored answer key (rows live in `answer_rows`)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnswerKeyMeta {
    pub guid: String,
    pub name: String,
    pub active: bool,
    pub row_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One persisted evaluation, immutable after insert
///
/// `preview` is the JSON-serialized list of row verdicts selected for the
/// response payload (mismatches first, bounded length).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubmissionRow {
    pub guid: String,
    pub participant_id: String,
    pub attempt_number: i64,
    pub submitted_at: DateTime<Utc>,
    pub rows_in_canonical: i64,
    pub rows_in_submission: i64,
    pub rows_compared: i64,
    pub missing_rows: i64,
    pub extra_rows: i64,
    pub matches: i64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub preview: String,
}
