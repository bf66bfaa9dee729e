// All LLM prompt text for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::generation::request::GenerationRequest;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// System prompt for argument generation.
pub const ARGUMENT_SYSTEM: &str =
    "You write concise, PM-friendly arguments for product proposals.";

/// Label the first line of every generated argument must start with.
pub const FEATURE_IDEA_LABEL: &str = "Feature Idea:";

/// Extra instruction appended when the request carries a screenshot.
pub const IMAGE_INSTRUCTION: &str = "- **Screenshot attached:** Use the attached image to \
    identify the specific interface gaps this feature would close.";

const NO_EVIDENCE: &str = "No specific data provided.";

/// Builds the argument-generation prompt for a request.
///
/// Inputs are interpolated verbatim in a single pass. Nothing is sanitized, so a
/// request can steer the model; that is accepted for this tool.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let GenerationRequest {
        feature,
        problem,
        persona_label,
        persona_note,
        outcome_label,
        ..
    } = request;

    let evidence = request
        .evidence
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(NO_EVIDENCE);
    let image_line = if request.image_present() {
        format!("\n{IMAGE_INSTRUCTION}")
    } else {
        String::new()
    };
    let focus_line = request
        .persona_focus
        .map(|focus| format!("\n- **PM Focus:** {focus}"))
        .unwrap_or_default();
    let metric_line = request
        .outcome_metric
        .map(|metric| format!("\n- **Sales Metric:** {metric}"))
        .unwrap_or_default();
    let sentence_band = request.length.sentence_band();
    let json_only = JSON_ONLY_INSTRUCTION;
    let label = FEATURE_IDEA_LABEL;

    format!(
        r#"You are a product strategist who turns raw feature requests from the sales team into concrete, defensible arguments that a product manager will take seriously.

### REQUEST FROM SALES
- **The Feature Idea:** {feature} (may be vague; make it concrete)
- **The Problem It Solves:** {problem}
- **The Sales Goal:** "{outcome_label}"{metric_line}
- **The Proof Point:** {evidence}{image_line}

### AUDIENCE
- **PM Type:** {persona_label}{focus_line}
- **PM Personality/Tone:** {persona_note}

### TRANSLATION STRATEGY
1. **Make it concrete:** Rephrase vague asks (e.g. "make it better") as specific product functionality (e.g. "streamline the API authentication flow").
2. **Bridge the goal:** Connect "{outcome_label}" to what the PM is measured on: retention, churn, activation, acquisition.
3. **Product language:** Talk about reducing friction, unblocking the funnel, mitigating churn risk. Never use sales phrasing such as "the client really wants this" or "we need this to win".
4. **Mirror the PM:** Let "{persona_note}" set the tone. Clinical for data-driven PMs, human for user-centric ones.
5. **Soft close:** End with a low-stakes next step, such as a short scoping session or a review of the evidence.

### CONSTRAINTS
- **Format:** {json_only} Shape: {{"variants": ["string"]}}
- **Content:** Exactly ONE variant, ready to copy and paste.
- **Opening:** The first line must start with "{label} " followed by a succinct description of the feature.
- **Named askers:** If the Proof Point names a specific customer or user, name them explicitly in the output.
- **Success criteria:** Use the problem statement to define what success looks like once it is solved.
- **Length:** Exactly {sentence_band} sentences.

### OUTPUT TEMPLATE
**{label}** <succinct description of the feature>

**Problem & Impact:** <tie the problem to PM impact>
**Success Looks Like:** <success defined from the problem>
**Evidence & Ask:** <named customer or user if given; end with the low-stakes next step>
"#
    )
}
