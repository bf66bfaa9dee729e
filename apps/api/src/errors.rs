use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::generator::{GenerationError, GenerationFailure};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders the same flat `{ "error": "<message>" }` body the form expects.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation => AppError::Validation("Feature is required.".to_string()),
            GenerationError::ServiceUnavailable => {
                AppError::ServiceUnavailable("Missing OPENAI_API_KEY in environment.".to_string())
            }
            GenerationError::Failed(GenerationFailure::MissingVariants(_)) => {
                AppError::Llm("No variants returned.".to_string())
            }
            GenerationError::Failed(failure) => {
                tracing::error!("Generation failed: {failure}");
                AppError::Llm("Failed to generate argument.".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Llm(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::MethodNotAllowed { allow } => {
                let body = Json(json!({ "error": "Method not allowed." }));
                return (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(header::ALLOW, *allow)],
                    body,
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
