//! Structure analysis and complexity scoring

use crate::cleaner::extract_sentences;
use docsift_domain::ContentStructure;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[•\-*\d+.]\s+").unwrap());
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^.*\|.*\|.*$").unwrap());
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?;:,]").unwrap());

/// Words read per minute for the reading-time estimate
pub const WORDS_PER_MINUTE: f64 = 200.0;

/// Analyze paragraphs, headings, lists, tables and complexity
pub fn analyze(text: &str) -> ContentStructure {
    let paragraph_count = text
        .split("\n\n")
        .filter(|p| p.trim().chars().count() > 50)
        .count();

    let lines: Vec<&str> = text.split('\n').collect();
    let heading_count = lines
        .windows(2)
        .filter(|pair| {
            let line = pair[0].trim();
            let len = line.chars().count();
            (10..=80).contains(&len)
                && !line.ends_with('.')
                && pair[1].trim().chars().count() > 100
        })
        .count();

    let list_count = LIST_ITEM.find_iter(text).count();
    let table_count = TABLE_ROW.find_iter(text).count();
    let word_count = text.split_whitespace().count();

    ContentStructure {
        has_title: heading_count > 0,
        has_headings: heading_count > 1,
        has_paragraphs: paragraph_count > 1,
        has_lists: list_count > 0,
        has_tables: table_count > 0,
        paragraph_count,
        heading_count,
        list_count,
        table_count,
        word_count,
        reading_time_minutes: word_count as f64 / WORDS_PER_MINUTE,
        complexity_score: complexity(text),
    }
}

/// Complexity score in [0, 1]
///
/// Sum of: average sentence length band (0.3 for 10-20 words, 0.2 for 5-10
/// or 20-30), 0.2 when distinct sentence lengths exceed half the sentence
/// count, vocabulary ratio times 0.5 capped at 0.3, and 0.05 per distinct
/// punctuation type capped at 0.2.
pub fn complexity(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;

    let lengths: Vec<usize> = extract_sentences(text)
        .iter()
        .map(|s| s.split_whitespace().count())
        .collect();
    if !lengths.is_empty() {
        let avg = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
        if (10.0..=20.0).contains(&avg) {
            score += 0.3;
        } else if (5.0..10.0).contains(&avg) || (avg > 20.0 && avg <= 30.0) {
            score += 0.2;
        }

        let distinct: HashSet<usize> = lengths.iter().copied().collect();
        if distinct.len() as f64 > lengths.len() as f64 * 0.5 {
            score += 0.2;
        }
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if !words.is_empty() {
        let unique: HashSet<&str> = words.iter().copied().collect();
        let ratio = unique.len() as f64 / words.len() as f64;
        score += (ratio * 0.5).min(0.3);
    }

    let punct: HashSet<&str> = PUNCTUATION.find_iter(text).map(|m| m.as_str()).collect();
    score += (punct.len() as f64 * 0.05).min(0.2);

    score.min(1.0)
}
