// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Output fragment that enforces JSON-only output. Interpolated into generation prompts.
pub const JSON_ONLY_INSTRUCTION: &str = "Output ONLY a JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
