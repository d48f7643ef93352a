//! Candidate factual claim detection
//!
//! Scoring is a fixed sum of regex signals per sentence, clamped to 1.0:
//!
//! | Signal | Weight |
//! |--------|--------|
//! | each factual-indicator class | +0.3 |
//! | each claim pattern | +0.2 |
//! | percentage | +0.3 |
//! | large or decimal number | +0.2 |
//! | year-anchored temporal phrase | +0.2 |
//! | comparative language | +0.1 |

use crate::cleaner::{back_chars, forward_chars, sentence_spans};
use crate::error::TextError;
use docsift_domain::PotentialClaim;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Characters of context kept on each side of a claim
pub const CONTEXT_CHARS: usize = 200;

/// Maximum keywords per claim
pub const MAX_KEYWORDS: usize = 10;

/// Maximum entities per claim
pub const MAX_ENTITIES: usize = 5;

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static FACTUAL_INDICATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)\b(?:according to|research shows|studies indicate|data reveals)\b",
        r"(?i)\b(?:statistics show|evidence suggests|findings indicate)\b",
        r"(?i)\b(?:experts say|scientists believe|researchers found)\b",
        r"(?i)\b(?:\d+(?:\.\d+)?%|\d+(?:,\d{3})*(?:\.\d+)?)\b",
        r"(?i)\b(?:in \d{4}|since \d{4}|by \d{4})\b",
        r"(?i)\b(?:increased by|decreased by|rose to|fell to)\b",
        r"(?i)\b(?:compared to|versus|vs\.?|relative to)\b",
    ])
});

static CLAIM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"[A-Z][^.!?]*(?:is|are|was|were|will be|has been|have been)[^.!?]*[.!?]",
        r"[A-Z][^.!?]*(?:shows?|proves?|demonstrates?|indicates?)[^.!?]*[.!?]",
        r"[A-Z][^.!?]*(?:\d+(?:\.\d+)?%|\d+(?:,\d{3})*(?:\.\d+)?)[^.!?]*[.!?]",
    ])
});

static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?%").unwrap());
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\b").unwrap());
static TEMPORAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:in|since|by|during) \d{4}\b").unwrap());
static COMPARATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:more|less|higher|lower|increased|decreased)\b").unwrap()
});
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").unwrap());
static PROPER_NOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").unwrap());
static ORGANIZATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b[A-Z][a-z]*(?:\s+[A-Z][a-z]*)*(?:\s+(?:Inc|Corp|LLC|Ltd|Company|Organization|Institute|University|College))\b",
    )
    .unwrap()
});

const STOP_WORDS: [&str; 43] = [
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from", "up",
    "about", "into", "through", "during", "before", "after", "above", "below", "between",
    "among", "this", "that", "these", "those", "was", "were", "been", "have", "has", "had",
    "will", "would", "could", "should", "may", "might", "can", "must", "shall",
];

/// Scores sentences and emits those above a threshold as claims
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimDetector;

impl ClaimDetector {
    /// Create a detector
    pub fn new() -> Self {
        Self
    }

    /// Detect claims in `text` with confidence at or above `threshold`
    ///
    /// Claim offsets are byte offsets into `text`.
    pub fn detect(&self, text: &str, threshold: f64) -> Result<Vec<PotentialClaim>, TextError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(TextError::ClaimDetection(format!(
                "confidence threshold {} outside [0, 1]",
                threshold
            )));
        }

        let claims = sentence_spans(text)
            .into_iter()
            .filter_map(|span| {
                let sentence = &text[span.clone()];
                let confidence = confidence(sentence);
                (confidence >= threshold).then(|| PotentialClaim {
                    text: sentence.to_string(),
                    start: span.start,
                    end: span.end,
                    confidence,
                    claim_kind: "factual".to_string(),
                    context: context(text, span.start, span.end),
                    keywords: keywords(sentence),
                    entities: entities(sentence),
                })
            })
            .collect();
        Ok(claims)
    }
}

/// Claim confidence of one sentence, in [0, 1]
pub fn confidence(sentence: &str) -> f64 {
    let mut score = 0.0;

    score += 0.3 * FACTUAL_INDICATORS.iter().filter(|re| re.is_match(sentence)).count() as f64;
    score += 0.2 * CLAIM_PATTERNS.iter().filter(|re| re.is_match(sentence)).count() as f64;

    if PERCENTAGE.is_match(sentence) {
        score += 0.3;
    }
    if NUMBER.is_match(sentence) {
        score += 0.2;
    }
    if TEMPORAL.is_match(sentence) {
        score += 0.2;
    }
    if COMPARATIVE.is_match(sentence) {
        score += 0.1;
    }

    score.min(1.0)
}

/// Text around `start..end` with `...` marking truncated edges
fn context(text: &str, start: usize, end: usize) -> String {
    let from = back_chars(text, start, CONTEXT_CHARS);
    let to = forward_chars(text, end, CONTEXT_CHARS);

    let mut out = String::with_capacity(to - from + 6);
    if from > 0 {
        out.push_str("...");
    }
    out.push_str(&text[from..to]);
    if to < text.len() {
        out.push_str("...");
    }
    out
}

/// Lowercased non-stop-words longer than three letters, first occurrence order
pub fn keywords(sentence: &str) -> Vec<String> {
    let lowered = sentence.to_lowercase();
    let mut seen = HashSet::new();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| w.len() > 3)
        .filter(|w| !STOP_WORDS.contains(w))
        .filter(|w| seen.insert(*w))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Capitalized word runs, then organization names, first occurrence order
pub fn entities(sentence: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PROPER_NOUN
        .find_iter(sentence)
        .chain(ORGANIZATION.find_iter(sentence))
        .map(|m| m.as_str())
        .filter(|e| seen.insert(*e))
        .take(MAX_ENTITIES)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVENUE: &str = "Revenue increased by 12.5% in 2023 according to the annual report.";

    #[test]
    fn test_patterns_compile() {
        assert_eq!(FACTUAL_INDICATORS.len(), 7);
        assert_eq!(CLAIM_PATTERNS.len(), 3);
        let _ = (&*PERCENTAGE, &*NUMBER, &*TEMPORAL, &*COMPARATIVE);
        let _ = (&*WORD, &*PROPER_NOUN, &*ORGANIZATION);
    }

    #[test]
    fn test_single_revenue_claim() {
        let claims = ClaimDetector::new().detect(REVENUE, 0.5).unwrap();
        assert_eq!(claims.len(), 1);
        let claim = &claims[0];
        assert!(claim.confidence >= 0.9);
        assert_eq!(claim.start, 0);
        assert_eq!(claim.end, REVENUE.len());
        assert_eq!(claim.claim_kind, "factual");
        assert_eq!(claim.context, REVENUE);
    }

    #[test]
    fn test_percentage_indicator_year_reaches_floor() {
        // factual indicator 0.3 + percentage 0.3 + year 0.2 before clamping
        let score = confidence("Experts say unemployment hit 7% in 2020");
        assert!(score >= 0.8);
    }

    #[test]
    fn test_plain_sentence_scores_low() {
        let score = confidence("the cat sat quietly on the mat today");
        assert!(score < 0.3);
    }

    #[test]
    fn test_comparative_only() {
        assert!((confidence("prices went higher after the news") - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_filters() {
        let text = "the weather was nice and calm that afternoon. Researchers found that 45% of users prefer dark mode.";
        let claims = ClaimDetector::new().detect(text, 0.5).unwrap();
        assert_eq!(claims.len(), 1);
        assert!(claims[0].text.starts_with("Researchers found"));
        assert_eq!(&text[claims[0].start..claims[0].end], claims[0].text);
        assert_eq!(claims[0].context, text);
    }

    #[test]
    fn test_invalid_threshold() {
        let err = ClaimDetector::new().detect("Some text here.", 1.5).unwrap_err();
        assert!(matches!(err, TextError::ClaimDetection(_)));
    }

    #[test]
    fn test_keywords_ordered_and_filtered() {
        let words = keywords("The Research shows that research funding increased between years");
        assert_eq!(
            words,
            vec!["research", "shows", "funding", "increased", "years"]
        );
    }

    #[test]
    fn test_keywords_capped() {
        let sentence = "alpha bravo charlie delta echoes foxtrot golfer hotel india juliet kilos lima";
        assert_eq!(keywords(sentence).len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_entities() {
        let found = entities("Officials at Stanford University met Jane Doe in Paris");
        assert_eq!(found[0], "Officials");
        assert!(found.contains(&"Stanford University".to_string()));
        assert!(found.contains(&"Jane Doe".to_string()));
        assert!(found.len() <= MAX_ENTITIES);
    }

    #[test]
    fn test_context_window_is_char_safe() {
        let prefix = format!("{}.", "é".repeat(300));
        let text = format!("{prefix} Scientists believe 30% of glaciers shrank since 1990.");
        let claims = ClaimDetector::new().detect(&text, 0.5).unwrap();
        assert_eq!(claims.len(), 1);
        assert!(claims[0].context.starts_with("..."));
    }
}
