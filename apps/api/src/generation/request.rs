//! Request models for argument generation: the wire body and the resolved request.

use serde::Deserialize;

use crate::generation::catalog;

/// Only data URLs with this prefix are forwarded to the model.
pub const IMAGE_DATA_URL_PREFIX: &str = "data:image/";

/// Minimum number of characters `feature` must have after trimming, exclusive.
const MIN_FEATURE_CHARS: usize = 2;

/// JSON body of `POST /api/generate`, exactly as the form posts it.
/// Every field is optional on the wire; validation happens on the resolved request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub feature: Option<String>,
    pub problem: Option<String>,
    pub persona: Option<String>,
    pub persona_archetype: Option<String>,
    pub persona_note: Option<String>,
    pub outcome: Option<String>,
    pub evidence: Option<String>,
    pub length: Option<String>,
    pub image_data_url: Option<String>,
}

/// Desired argument length. `"ultra"` is the short form; every other value is standard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgumentLength {
    Ultra,
    #[default]
    Standard,
}

impl ArgumentLength {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("ultra") => ArgumentLength::Ultra,
            _ => ArgumentLength::Standard,
        }
    }

    /// Sentence band the model is instructed to hit.
    pub fn sentence_band(self) -> &'static str {
        match self {
            ArgumentLength::Ultra => "2-3",
            ArgumentLength::Standard => "4-6",
        }
    }
}

/// A screenshot attached to the request, as a `data:image/...` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub data_url: String,
}

impl ImageAttachment {
    /// Returns `None` for anything that is not an image data URL.
    pub fn from_data_url(raw: Option<String>) -> Option<Self> {
        raw.filter(|url| url.starts_with(IMAGE_DATA_URL_PREFIX))
            .map(|data_url| ImageAttachment { data_url })
    }
}

/// A resolved generation request. Ids from the form are already mapped to labels.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub feature: String,
    pub problem: String,
    pub persona_label: String,
    /// What the persona cares about, when the persona is a known catalog entry.
    pub persona_focus: Option<&'static str>,
    pub persona_note: String,
    pub outcome_label: String,
    /// Metric the outcome moves, when the outcome is a known catalog entry.
    pub outcome_metric: Option<&'static str>,
    pub evidence: Option<String>,
    pub length: ArgumentLength,
    pub image: Option<ImageAttachment>,
}

impl GenerationRequest {
    pub fn has_valid_feature(&self) -> bool {
        self.feature.trim().chars().count() > MIN_FEATURE_CHARS
    }

    pub fn image_present(&self) -> bool {
        self.image.is_some()
    }
}

impl From<GenerateBody> for GenerationRequest {
    fn from(body: GenerateBody) -> Self {
        let persona_id = body.persona.as_deref().map(str::trim);
        let outcome_id = body.outcome.as_deref().map(str::trim);

        GenerationRequest {
            persona_label: catalog::persona_label(
                body.persona.as_deref(),
                body.persona_archetype.as_deref(),
            ),
            persona_focus: persona_id.and_then(catalog::find_persona).map(|p| p.focus),
            outcome_label: catalog::outcome_label(body.outcome.as_deref()),
            outcome_metric: outcome_id.and_then(catalog::find_outcome).map(|o| o.metric),
            feature: body.feature.unwrap_or_default(),
            problem: body.problem.unwrap_or_default(),
            persona_note: body.persona_note.unwrap_or_default(),
            evidence: body.evidence.filter(|e| !e.trim().is_empty()),
            length: ArgumentLength::from_wire(body.length.as_deref()),
            image: ImageAttachment::from_data_url(body.image_data_url),
        }
    }
}
