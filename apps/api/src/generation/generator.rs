//! Argument Generation — orchestrates one model call with a local fallback.
//!
//! Flow: validate → build_prompt → model.complete (one attempt) → parse `variants`
//!       → first variant, or fallback copy when anything in the call fails.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::FallbackPolicy;
use crate::generation::fallback;
use crate::generation::prompts::{build_prompt, ARGUMENT_SYSTEM};
use crate::generation::request::GenerationRequest;
use crate::llm_client::{LlmClient, LlmError, UserMessage};

/// Notice shown next to fallback copy.
pub const FALLBACK_NOTICE: &str = "LLM unavailable. Showing local fallback copy.";

// ────────────────────────────────────────────────────────────────────────────
// Model seam
// ────────────────────────────────────────────────────────────────────────────

/// Anything that can answer an argument prompt with raw JSON text.
#[async_trait]
pub trait ArgumentModel: Send + Sync {
    async fn complete(&self, message: UserMessage<'_>) -> Result<String, LlmError>;
}

#[async_trait]
impl ArgumentModel for LlmClient {
    async fn complete(&self, message: UserMessage<'_>) -> Result<String, LlmError> {
        self.call_text(message, ARGUMENT_SYSTEM).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors and results
// ────────────────────────────────────────────────────────────────────────────

/// Why a model call produced nothing usable. All of these trigger the fallback.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("transport error: {0}")]
    Transport(LlmError),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no usable variants: {0}")]
    MissingVariants(String),
}

impl GenerationFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationFailure::Transport(_) => "transport",
            GenerationFailure::Malformed(_) => "malformed",
            GenerationFailure::MissingVariants(_) => "missing_variants",
        }
    }
}

impl From<LlmError> for GenerationFailure {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => GenerationFailure::Malformed(e.to_string()),
            LlmError::EmptyContent => {
                GenerationFailure::MissingVariants("model returned no content".to_string())
            }
            other => GenerationFailure::Transport(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("feature is required")]
    Validation,

    #[error("no generation model is configured")]
    ServiceUnavailable,

    #[error("generation failed: {0}")]
    Failed(#[from] GenerationFailure),
}

/// Marks an argument as locally synthesized.
#[derive(Debug, Clone)]
pub struct FallbackNotice {
    /// `transport`, `malformed` or `missing_variants`.
    pub cause: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone)]
pub struct GeneratedArgument {
    pub text: String,
    /// `Some` when the text came from the fallback path.
    pub fallback: Option<FallbackNotice>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Generates one argument for the request.
///
/// - invalid feature → `Validation`, nothing else happens
/// - no model → `ServiceUnavailable`, no call is made
/// - any model failure → fallback copy when `policy` is `Server`, `Failed` otherwise
pub async fn generate_argument(
    model: Option<&dyn ArgumentModel>,
    request: &GenerationRequest,
    policy: FallbackPolicy,
) -> Result<GeneratedArgument, GenerationError> {
    if !request.has_valid_feature() {
        return Err(GenerationError::Validation);
    }

    let model = model.ok_or(GenerationError::ServiceUnavailable)?;

    info!(
        "Generating argument: length={:?}, image={}",
        request.length,
        request.image_present()
    );

    match request_variant(model, request).await {
        Ok(text) => Ok(GeneratedArgument {
            text,
            fallback: None,
        }),
        Err(failure) => {
            warn!(cause = failure.kind(), "Argument generation failed: {failure}");
            match policy {
                FallbackPolicy::Server => Ok(GeneratedArgument {
                    text: fallback::synthesize(request),
                    fallback: Some(FallbackNotice {
                        cause: failure.kind(),
                        message: FALLBACK_NOTICE,
                    }),
                }),
                FallbackPolicy::Off => Err(GenerationError::Failed(failure)),
            }
        }
    }
}

/// Single model attempt. Returns the first variant; extra variants are discarded.
pub async fn request_variant(
    model: &dyn ArgumentModel,
    request: &GenerationRequest,
) -> Result<String, GenerationFailure> {
    let prompt = build_prompt(request);
    let message = UserMessage {
        text: &prompt,
        image_data_url: request.image.as_ref().map(|i| i.data_url.as_str()),
    };

    let content = model.complete(message).await?;
    first_variant(&content)
}

/// Parses `{"variants": [...]}` and returns the first entry.
pub fn first_variant(content: &str) -> Result<String, GenerationFailure> {
    let parsed: Value = serde_json::from_str(content)
        .map_err(|e| GenerationFailure::Malformed(format!("content is not JSON: {e}")))?;

    let variants = match parsed.get("variants") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(GenerationFailure::MissingVariants(
                "`variants` is not a list".to_string(),
            ))
        }
        None => {
            return Err(GenerationFailure::MissingVariants(
                "`variants` key is absent".to_string(),
            ))
        }
    };

    match variants.first() {
        None => Err(GenerationFailure::MissingVariants(
            "`variants` is empty".to_string(),
        )),
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.clone()),
        Some(_) => Err(GenerationFailure::MissingVariants(
            "first variant is not a non-empty string".to_string(),
        )),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
