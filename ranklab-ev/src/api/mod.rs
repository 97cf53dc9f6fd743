//! HTTP API layer
//!
//! Thin axum handlers over the ledger, leaderboard, and answer-key store.
//! All bodies are JSON; errors map onto the status codes below and carry a
//! `{"error": ...}` body.

pub mod answer_key;
pub mod health;
pub mod leaderboard;
pub mod participants;
pub mod submissions;

pub use answer_key::{get_answer_key, replace_answer_key};
pub use health::health_routes;
pub use leaderboard::get_leaderboard;
pub use participants::create_participant;
pub use submissions::submit;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use ranklab_common::Error;

/// Error wrapper translating core errors into HTTP responses
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string()),
            Error::QuotaExceeded { .. } => (StatusCode::TOO_MANY_REQUESTS, self.0.to_string()),
            Error::EmptyInput | Error::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            Error::NoOverlap => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            other => {
                // Detail stays in the log; the caller gets a generic body
                error!("Internal error handling request: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
