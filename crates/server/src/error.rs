// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use playlog_db::DbError;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Structured JSON error body for API errors.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../../src/types/generated/")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map onto HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Game not found: {0}")]
    GameNotFound(i64),

    #[error("Cycle not found: {0}")]
    CycleNotFound(i64),

    #[error("Session not found: {0}")]
    SessionNotFound(i64),

    #[error("Rating not found: {0}")]
    RatingNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::GameNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::with_details("Game not found", format!("Game ID: {id}")),
            ),
            ApiError::CycleNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::with_details("Cycle not found", format!("Cycle ID: {id}")),
            ),
            ApiError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::with_details("Session not found", format!("Session ID: {id}")),
            ),
            ApiError::RatingNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::with_details("Rating not found", format!("Rating ID: {id}")),
            ),
            ApiError::Database(db_err) => {
                tracing::error!(error = %db_err, "Database error");
                // The body hides storage internals from clients.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Database error"),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
            ApiError::Conflict(msg) => {
                tracing::debug!(message = %msg, "Conflict");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::with_details("Conflict", msg.clone()),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
