//! Answer-key management endpoints
//!
//! The replacement endpoint is the in-process boundary of the external
//! ingestion collaborator: rows arrive already tokenized, and data-quality
//! validation (duplicate or empty ids) happens here, not at evaluation
//! time.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use ranklab_common::db::AnswerKeyMeta;

use crate::api::ApiError;
use crate::eval::{normalize_rows, RawRow};
use crate::AppState;

/// PUT /api/answer-key request body
#[derive(Debug, Deserialize)]
pub struct ReplaceKeyRequest {
    pub name: String,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceKeyResponse {
    pub answer_key_id: String,
    pub name: String,
    pub row_count: usize,
}

/// PUT /api/answer-key
///
/// Replaces the active canonical answer set. In-flight evaluations finish
/// on the snapshot they started with; past submissions keep their metrics.
pub async fn replace_answer_key(
    State(state): State<AppState>,
    Json(request): Json<ReplaceKeyRequest>,
) -> Result<Json<ReplaceKeyResponse>, ApiError> {
    let records = normalize_rows(&request.rows);
    let key = state
        .answer_key
        .replace(&state.db, request.name.trim(), records)
        .await?;

    Ok(Json(ReplaceKeyResponse {
        answer_key_id: key.guid.clone(),
        name: key.name.clone(),
        row_count: key.records.len(),
    }))
}

/// GET /api/answer-key
///
/// Metadata of the active answer key; 404 when none is configured.
pub async fn get_answer_key(
    State(state): State<AppState>,
) -> Result<Json<AnswerKeyMeta>, ApiError> {
    let meta = state.answer_key.active_meta(&state.db).await?;
    Ok(Json(meta))
}
