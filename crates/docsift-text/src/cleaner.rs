//! Text cleaning, boilerplate removal and sentence splitting

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static CONTROL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());
static DOUBLE_QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[“”„]").unwrap());
static SINGLE_QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[‘’‚]").unwrap());
static ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{3,}").unwrap());
static BANGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!{2,}").unwrap());
static QUESTIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?{2,}").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+([,.!?;:])").unwrap());
static SENTENCE_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])[ \t]*([A-Z])").unwrap());
static BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:cookie policy|privacy policy|terms of service|subscribe to.*?newsletter|follow us on|share this article|advertisement)[^\n]*",
    )
    .unwrap()
});
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+\s+").unwrap());

/// Normalize whitespace, quotes and punctuation
///
/// Whitespace runs holding two or more newlines become a paragraph break,
/// a single newline is kept, anything else collapses to one space.
pub fn clean(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = WHITESPACE.replace_all(text, |caps: &Captures| {
        match caps[0].matches('\n').count() {
            0 => " ",
            1 => "\n",
            _ => "\n\n",
        }
    });
    let text = CONTROL.replace_all(&text, "");
    let text = DOUBLE_QUOTES.replace_all(&text, "\"");
    let text = SINGLE_QUOTES.replace_all(&text, "'");
    let text = ELLIPSIS.replace_all(&text, "...");
    let text = BANGS.replace_all(&text, "!");
    let text = QUESTIONS.replace_all(&text, "?");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = SENTENCE_JOIN.replace_all(&text, "$1 $2");

    tidy_lines(&text)
}

/// Strip cookie, privacy, newsletter, share and advertisement lines
pub fn remove_boilerplate(text: &str) -> String {
    let kept: Vec<_> = text
        .split('\n')
        .filter_map(|line| {
            let stripped = BOILERPLATE.replace_all(line, "");
            if stripped.trim().is_empty() && !line.trim().is_empty() {
                None
            } else {
                Some(stripped)
            }
        })
        .collect();
    tidy_lines(&kept.join("\n"))
}

/// Trim each line and the whole text, keeping paragraph breaks intact
fn tidy_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.split('\n') {
        let line = line.trim_matches(|c| c == ' ' || c == '\t');
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = 0;
    }
    out
}

/// Sentence spans as byte ranges into `text`
///
/// Splits on runs of `.`, `!` or `?` followed by whitespace. The separator is
/// not part of the span, so only the final sentence keeps its terminal mark.
/// Spans of ten characters or fewer and all-caps spans are dropped.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for sep in SENTENCE_BREAK.find_iter(text) {
        push_sentence(text, cursor..sep.start(), &mut spans);
        cursor = sep.end();
    }
    push_sentence(text, cursor..text.len(), &mut spans);
    spans
}

/// Sentence texts, as produced by [`sentence_spans`]
pub fn extract_sentences(text: &str) -> Vec<&str> {
    sentence_spans(text)
        .into_iter()
        .map(|span| &text[span])
        .collect()
}

fn push_sentence(text: &str, range: Range<usize>, spans: &mut Vec<Range<usize>>) {
    let span = trimmed(text, range);
    let sentence = &text[span.clone()];
    if sentence.chars().count() > 10 && !is_all_caps(sentence) {
        spans.push(span);
    }
}

/// Narrow `range` so the slice has no leading or trailing whitespace
pub(crate) fn trimmed(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    if start >= end {
        start..start
    } else {
        start..end
    }
}

/// True when the text has cased letters and none of them are lowercase
pub(crate) fn is_all_caps(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Largest char boundary at or below `index`
pub(crate) fn floor_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary at or above `index`
pub(crate) fn ceil_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Byte index `chars` characters before `index`, clamped at zero
pub(crate) fn back_chars(text: &str, index: usize, chars: usize) -> usize {
    if chars == 0 {
        return index;
    }
    text[..index]
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte index `chars` characters after `index`, clamped at the end
pub(crate) fn forward_chars(text: &str, index: usize, chars: usize) -> usize {
    text[index..]
        .char_indices()
        .nth(chars)
        .map(|(i, _)| index + i)
        .unwrap_or(text.len())
}
