use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::persona::loader::LoadError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resume error: {0}")]
    Resume(#[from] LoadError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Resume(e @ LoadError::NotFound(_)) => {
                tracing::error!("Resume load failed: {e}");
                (StatusCode::NOT_FOUND, "RESUME_NOT_FOUND", e.to_string())
            }
            AppError::Resume(e) => {
                tracing::error!("Resume load failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "RESUME_UNREADABLE",
                    e.to_string(),
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
