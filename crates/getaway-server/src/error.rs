//! Error types for the API layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that converts
//! into an Axum HTTP response. Engine policy violations map to 409 so the
//! polling clients know to re-query state before retrying; storage
//! unavailability maps to 503.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use getaway_engine::EngineError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The user segment or token did not validate.
    #[error("unauthorized")]
    Unauthorized,

    /// The path segment does not name a participant.
    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    /// A game service operation failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A serialization error while building the response.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::UnknownParticipant(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Engine(e) => (engine_status(e), e.to_string()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map engine errors onto HTTP status codes.
const fn engine_status(error: &EngineError) -> StatusCode {
    match error {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Elimination(_)
        | EngineError::PhaseClosed { .. }
        | EngineError::PoolAlreadyCombined
        | EngineError::AlreadySpunToday
        | EngineError::NothingToSpinOn
        | EngineError::TieBreakNotPending => StatusCode::CONFLICT,
    }
}
