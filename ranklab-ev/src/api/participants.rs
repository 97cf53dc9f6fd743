//! Participant creation endpoint
//!
//! Minimal identity surface: the ledger needs an opaque stable id and an
//! optional quota override. Credential and session machinery lives in an
//! external collaborator.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ranklab_common::Error;

use crate::api::ApiError;
use crate::AppState;

/// POST /api/participants request body
#[derive(Debug, Deserialize)]
pub struct CreateParticipantRequest {
    pub display_name: String,
    /// Per-participant submission allowance; absent means the global default
    pub quota_override: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateParticipantResponse {
    pub participant_id: String,
    pub display_name: String,
    pub quota_override: Option<i64>,
}

/// POST /api/participants
pub async fn create_participant(
    State(state): State<AppState>,
    Json(request): Json<CreateParticipantRequest>,
) -> Result<Json<CreateParticipantResponse>, ApiError> {
    let display_name = request.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ApiError(Error::InvalidInput(
            "display_name must not be empty".to_string(),
        )));
    }
    if let Some(quota) = request.quota_override {
        if quota < 0 {
            return Err(ApiError(Error::InvalidInput(
                "quota_override must not be negative".to_string(),
            )));
        }
    }

    let guid = Uuid::new_v4().to_string();

    let result = sqlx::query(
        "INSERT INTO participants (guid, display_name, quota_override) VALUES (?, ?, ?)",
    )
    .bind(&guid)
    .bind(&display_name)
    .bind(request.quota_override)
    .execute(&state.db)
    .await;

    if let Err(sqlx::Error::Database(db_err)) = &result {
        if db_err.is_unique_violation() {
            return Err(ApiError(Error::InvalidInput(format!(
                "Display name already taken: {}",
                display_name
            ))));
        }
    }
    result.map_err(Error::from)?;

    Ok(Json(CreateParticipantResponse {
        participant_id: guid,
        display_name,
        quota_override: request.quota_override,
    }))
}
