// Argument generation: prompt building, one model call, local fallback.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod catalog;
pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod request;
