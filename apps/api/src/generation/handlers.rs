//! Axum route handlers for the Generation API.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::generator::generate_argument;
use crate::generation::request::{GenerateBody, GenerationRequest};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Exactly one entry today; the contract allows more.
    pub variants: Vec<String>,
    /// True when the text is local fallback copy.
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Why the model output was not used: `transport`, `malformed` or `missing_variants`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_cause: Option<&'static str>,
}

/// POST /api/generate
///
/// Builds the prompt, calls the model once, and returns one argument.
/// Model failures come back as fallback copy with `fallback: true` unless the
/// server fallback is switched off.
///
/// The body is parsed here rather than through the `Json` extractor so that a
/// missing body, a missing content type or a bad field still get a JSON error.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = GenerationRequest::from(parse_body(&body)?);

    let argument =
        generate_argument(state.model.as_deref(), &request, state.config.fallback).await?;

    let notice = argument.fallback;
    Ok(Json(GenerateResponse {
        variants: vec![argument.text],
        fallback: notice.is_some(),
        notice: notice.as_ref().map(|n| n.message.to_string()),
        fallback_cause: notice.map(|n| n.cause),
    }))
}

/// An empty body or a JSON `null` is treated as an empty form, which then fails
/// feature validation.
fn parse_body(raw: &[u8]) -> Result<GenerateBody, AppError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateBody::default());
    }
    serde_json::from_slice::<Option<GenerateBody>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

/// Any non-POST method on /api/generate.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed { allow: "POST" }
}
