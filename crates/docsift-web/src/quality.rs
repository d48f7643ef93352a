//! Shared quality heuristic for engine output
//!
//! Scores are sums of fixed awards clamped to 1.0. The weights are part of the
//! extractor's observable behavior; engine selection and fallback depend on
//! them, so changes here change which engine wins.

use crate::engines::EngineOutput;

const FUNCTION_WORDS: [&str; 4] = ["the", "and", "that", "with"];

/// Award for the text length in characters
pub fn length_score(chars: usize) -> f64 {
    match chars {
        500..=5000 => 0.3,
        200..=499 | 5001..=10_000 => 0.2,
        100..=199 => 0.1,
        _ => 0.0,
    }
}

/// Quality of `output` in [0, 1]; empty text scores zero
pub fn assess(output: &EngineOutput) -> f64 {
    let text = &output.text;
    if text.is_empty() {
        return 0.0;
    }

    let mut score = length_score(text.chars().count());

    if output
        .title
        .as_ref()
        .is_some_and(|t| t.chars().count() > 10)
    {
        score += 0.2;
    }
    if text.contains("\n\n") {
        score += 0.1;
    }

    let lower = text.to_lowercase();
    if FUNCTION_WORDS.iter().any(|w| lower.contains(w)) {
        score += 0.1;
    }

    let sentences = text.split('.').count();
    if (3..=100).contains(&sentences) {
        score += 0.2;
    }

    if output.author.is_some() {
        score += 0.1;
    }
    if output.publish_date.is_some() {
        score += 0.1;
    }

    score.min(1.0)
}
