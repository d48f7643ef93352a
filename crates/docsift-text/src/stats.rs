//! Text statistics and readability scores

use crate::cleaner::extract_sentences;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Counts and readability figures for a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Characters
    pub character_count: usize,
    /// Whitespace separated words
    pub word_count: usize,
    /// Sentences as split by the cleaner
    pub sentence_count: usize,
    /// Blank-line separated blocks
    pub paragraph_count: usize,
    /// Mean word length in characters
    pub average_word_length: f64,
    /// Mean words per sentence
    pub average_sentence_length: f64,
    /// Distinct lowercased words
    pub unique_words: usize,
    /// `unique_words / word_count`
    pub vocabulary_richness: f64,
    /// Flesch reading ease
    pub flesch_reading_ease: f64,
    /// Flesch-Kincaid grade level
    pub flesch_kincaid_grade: f64,
}

impl TextStatistics {
    /// Compute statistics for `text`
    pub fn compute(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        let sentence_count = extract_sentences(text).len();
        let unique_words = words
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<HashSet<_>>()
            .len();

        let word_count = words.len();
        let (average_word_length, vocabulary_richness) = if word_count > 0 {
            let letters: usize = words.iter().map(|w| w.chars().count()).sum();
            (
                letters as f64 / word_count as f64,
                unique_words as f64 / word_count as f64,
            )
        } else {
            (0.0, 0.0)
        };
        let average_sentence_length = if sentence_count > 0 {
            word_count as f64 / sentence_count as f64
        } else {
            0.0
        };

        let (flesch_reading_ease, flesch_kincaid_grade) = readability(&words, sentence_count);

        Self {
            character_count: text.chars().count(),
            word_count,
            sentence_count,
            paragraph_count: text.split("\n\n").count(),
            average_word_length,
            average_sentence_length,
            unique_words,
            vocabulary_richness,
            flesch_reading_ease,
            flesch_kincaid_grade,
        }
    }
}

/// Flesch reading ease and Flesch-Kincaid grade
fn readability(words: &[&str], sentences: usize) -> (f64, f64) {
    if words.is_empty() {
        return (0.0, 0.0);
    }
    let syllables: usize = words.iter().map(|w| syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences.max(1) as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    let ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
    (ease, grade)
}

/// Vowel-group syllable estimate, at least one per word with letters
pub fn syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if lower.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut previous_vowel = false;
    for &c in &lower {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    if lower.len() > 2 && lower.ends_with(&['e']) && !lower.ends_with(&['l', 'e']) && count > 1 {
        count -= 1;
    }
    count.max(1)
}
