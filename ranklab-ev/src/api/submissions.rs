//! Submission evaluation endpoint

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::eval::{RawRow, RowVerdict};
use crate::{ledger, AppState};

/// POST /api/submissions request body
///
/// Rows arrive pre-tokenized from the transport collaborator; the engine
/// only trims and joins them.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub participant_id: String,
    pub rows: Vec<RawRow>,
}

/// Evaluation response: metrics, summary counts, and the preview
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub submission_id: String,
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
    pub preview: Vec<RowVerdict>,
}

/// POST /api/submissions
///
/// Evaluates one submission against the active answer key and persists the
/// result. See the ledger for the gate ordering and concurrency rules.
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let outcome =
        ledger::evaluate_submission(&state, &request.participant_id, &request.rows).await?;

    let s = outcome.submission;
    Ok(Json(SubmitResponse {
        submission_id: s.guid,
        attempt_number: s.attempt_number,
        submitted_at: s.submitted_at,
        rows_in_canonical: s.rows_in_canonical,
        rows_in_submission: s.rows_in_submission,
        rows_compared: s.rows_compared,
        missing_rows: s.missing_rows,
        extra_rows: s.extra_rows,
        matches: s.matches,
        accuracy: s.accuracy,
        precision: s.precision,
        recall: s.recall,
        f1: s.f1,
        preview: outcome.preview,
    }))
}
