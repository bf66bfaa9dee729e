//! Option lists offered by the request form, and id → label resolution.
//!
//! The form posts ids (`growth`, `speed`, ...). Prompts and fallback copy need the
//! human label. Values that are not known ids are treated as free-text labels.

/// A PM archetype the argument is written for.
#[derive(Debug, Clone, Copy)]
pub struct Persona {
    pub id: &'static str,
    pub label: &'static str,
    pub focus: &'static str,
}

/// The sales-side goal motivating the request.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub id: &'static str,
    pub label: &'static str,
    pub metric: &'static str,
}

/// What the PM cares about most; refines the persona.
#[derive(Debug, Clone, Copy)]
pub struct Archetype {
    pub id: &'static str,
    pub label: &'static str,
}

pub const PERSONAS: &[Persona] = &[
    Persona {
        id: "growth",
        label: "Growth PM",
        focus: "activation, conversion, and retention loops",
    },
    Persona {
        id: "core",
        label: "Core Product PM",
        focus: "daily usage, clarity, and customer trust",
    },
    Persona {
        id: "new",
        label: "New Product PM",
        focus: "0-1, path to MVP, and market size",
    },
];

pub const OUTCOMES: &[Outcome] = &[
    Outcome {
        id: "speed",
        label: "Close more deals",
        metric: "deals closed",
    },
    Outcome {
        id: "precision",
        label: "Increase Deal Size",
        metric: "average contract value",
    },
    Outcome {
        id: "coverage",
        label: "Keep a Customer",
        metric: "renewal rate",
    },
];

pub const ARCHETYPES: &[Archetype] = &[
    Archetype {
        id: "data-revenue",
        label: "Data & Revenue",
    },
    Archetype {
        id: "ux-quality",
        label: "User Experience",
    },
    Archetype {
        id: "vision-strategy",
        label: "Long Term Scalability",
    },
];

pub fn find_persona(id: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.id == id)
}

pub fn find_outcome(id: &str) -> Option<&'static Outcome> {
    OUTCOMES.iter().find(|o| o.id == id)
}

pub fn find_archetype(id: &str) -> Option<&'static Archetype> {
    ARCHETYPES.iter().find(|a| a.id == id)
}

/// "Growth PM (Data & Revenue)". Either half may be missing.
pub fn persona_label(persona: Option<&str>, archetype: Option<&str>) -> String {
    let persona = resolve(persona, |id| find_persona(id).map(|p| p.label));
    let archetype = resolve(archetype, |id| find_archetype(id).map(|a| a.label));

    match (persona.is_empty(), archetype.is_empty()) {
        (false, false) => format!("{persona} ({archetype})"),
        (false, true) => persona,
        (true, false) => format!("PM ({archetype})"),
        (true, true) => String::new(),
    }
}

pub fn outcome_label(outcome: Option<&str>) -> String {
    resolve(outcome, |id| find_outcome(id).map(|o| o.label))
}

fn resolve(value: Option<&str>, lookup: impl Fn(&str) -> Option<&'static str>) -> String {
    let value = value.map(str::trim).unwrap_or_default();
    lookup(value)
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}
