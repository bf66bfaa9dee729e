//! Local fallback copy, used when the model call fails.
//!
//! Structure is fixed; only the opener and the closing ask are drawn at random.
//! Standard length is three sentences, ultra is two (the persona sentence is dropped).
//! Free text is reduced to a single clause before it is interpolated, so every
//! sentence ends with exactly one terminator. The text always ends with one of
//! `CLOSING_ASKS`.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::generation::request::{ArgumentLength, GenerationRequest};

/// Leading clauses for the first sentence. No terminal punctuation.
pub const OPENERS: &[&str] = &[
    "This is a direct, low-scope lever with real upside",
    "This is a focused, high-signal feature request",
    "This is a pragmatic move with measurable impact",
];

/// Closing asks. Each is one complete sentence.
pub const CLOSING_ASKS: &[&str] = &[
    "If you agree, I can send a 1-pager and we can run a quick smoke test.",
    "We can test this with a small cohort and review the lift together.",
    "Happy to put a one-pager together and run a lightweight pilot.",
];

/// Synthesizes fallback copy using the thread-local RNG.
pub fn synthesize(request: &GenerationRequest) -> String {
    synthesize_with(request, &mut rand::rng())
}

pub fn synthesize_with<R: Rng + ?Sized>(request: &GenerationRequest, rng: &mut R) -> String {
    let opener = OPENERS.choose(rng).copied().unwrap_or(OPENERS[0]);
    let ask = CLOSING_ASKS.choose(rng).copied().unwrap_or(CLOSING_ASKS[0]);

    let feature = to_clause(&request.feature);
    let feature = if feature.is_empty() {
        "this feature".to_string()
    } else {
        feature
    };

    let outcome = to_clause(&request.outcome_label).to_lowercase();
    let lead = if outcome.is_empty() {
        format!("{opener}: {feature} removes a recurring friction point.")
    } else {
        format!("{opener}: {feature} directly supports {outcome}.")
    };

    match request.length {
        ArgumentLength::Ultra => [lead.as_str(), ask].join(" "),
        ArgumentLength::Standard => {
            let framing = framing_sentence(&request.persona_label, &request.persona_note);
            [lead.as_str(), framing.as_str(), ask].join(" ")
        }
    }
}

fn framing_sentence(persona_label: &str, persona_note: &str) -> String {
    let label = to_clause(persona_label);
    let note = to_clause(persona_note);

    let audience = if label.is_empty() {
        "the PM".to_string()
    } else {
        format!("{} {label}", article_for(&label))
    };

    if note.is_empty() {
        format!("It is framed for {audience}.")
    } else {
        format!(
            "It is framed for {audience}, keeping in mind that {}.",
            lowercase_first(&note)
        )
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Splits text into sentences. A sentence ends at a run of `.`, `!` or `?` followed by
/// whitespace or the end of the text, so "v2.0" does not end one.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        match chars.peek() {
            Some(&(_, next)) if is_terminator(next) || !next.is_whitespace() => continue,
            _ => {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Collapses whitespace and folds free text into one clause: sentences are joined
/// with "; " and trailing terminators are dropped.
fn to_clause(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    split_sentences(&collapsed)
        .into_iter()
        .map(|s| s.trim_end_matches(is_terminator).trim_end())
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, s)| if i == 0 { s.to_string() } else { lowercase_first(s) })
        .collect::<Vec<_>>()
        .join("; ")
}

fn article_for(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// "They are ..." → "they are ...", but acronyms like "ARR matters" are left alone.
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && !second.is_uppercase() => {
            first.to_lowercase().chain(text[first.len_utf8()..].chars()).collect()
        }
        _ => text.to_string(),
    }
}
