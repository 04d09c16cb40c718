use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::service::ServiceError;
use crate::interview::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The request is well-formed but the session is not in a state that
    /// accepts it.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The scoring oracle failed. Nothing was recorded; the client may retry.
    #[error("Scoring failed: {0}")]
    Scoring(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Profile(_) | ServiceError::Upload(_) | ServiceError::EmptyAnswer => {
                AppError::Validation(e.to_string())
            }
            ServiceError::Session(SessionError::ScoreOutOfRange(_)) => {
                AppError::Validation(e.to_string())
            }
            ServiceError::Session(_) | ServiceError::EvaluationPending(_) => {
                AppError::Conflict(e.to_string())
            }
            ServiceError::Scoring(_) => AppError::Scoring(e.to_string()),
            ServiceError::ResultNotFound(_) => AppError::NotFound(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Scoring(msg) => {
                tracing::warn!("Scoring error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SCORING_FAILED",
                    "The answer could not be scored, please submit again".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
