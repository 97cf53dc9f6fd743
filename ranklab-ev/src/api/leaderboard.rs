//! Leaderboard endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use ranklab_common::db;
use ranklab_common::Error;

use crate::api::ApiError;
use crate::leaderboard::{self, LeaderboardEntry, RankLookup};
use crate::AppState;

/// Query parameters for the leaderboard
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Result-size limit; defaults to the `leaderboard_default_limit` setting
    pub limit: Option<i64>,

    /// Requesting participant for the rank lookup (optional)
    pub participant_id: Option<String>,
}

/// Leaderboard response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub total_participants: i64,
    /// Present when `participant_id` was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_rank: Option<RankLookup>,
}

/// GET /api/leaderboard?limit=N&participant_id=U
///
/// Recomputes the ranking from current persisted submissions on every call.
/// Rank reflects the full ordering; `limit` only truncates the returned
/// slice.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let limit = match query.limit {
        Some(limit) if limit >= 1 => limit,
        Some(limit) => {
            return Err(ApiError(Error::InvalidInput(format!(
                "limit must be a positive integer, got {}",
                limit
            ))))
        }
        None => db::leaderboard_default_limit(&state.db).await?,
    };

    let mut entries = leaderboard::compute_leaderboard(&state.db).await?;
    let total_participants = entries.len() as i64;

    let my_rank = query
        .participant_id
        .as_deref()
        .map(|participant_id| leaderboard::rank_lookup(&entries, participant_id));

    entries.truncate(limit as usize);

    Ok(Json(LeaderboardResponse {
        entries,
        total_participants,
        my_rank,
    }))
}
