use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every error body carries an `error` message; variants with diagnostic
/// payloads add a `details` field.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// The model answered but no avatar URL could be extracted.
    #[error("Could not parse avatar response")]
    UnparseableOutput(Value),

    #[error("Avatar generation failed: {0}")]
    Generation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::UnparseableOutput(raw) => {
                tracing::error!("Could not parse avatar URL from model response");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": "Could not parse avatar response",
                        "details": raw
                    }),
                )
            }
            AppError::Generation(msg) => {
                tracing::error!("Avatar generation error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to generate avatar",
                        "details": msg
                    }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
