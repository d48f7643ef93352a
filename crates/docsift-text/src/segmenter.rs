//! Text segmentation strategies
//!
//! Every strategy yields segments sorted by `start` and non-overlapping, with
//! `segment.text == text[segment.start..segment.end]`. Any failure falls back
//! to paragraph segmentation.

use crate::claims::{ClaimDetector, CONTEXT_CHARS};
use crate::cleaner::{back_chars, forward_chars, sentence_spans, trimmed};
use crate::error::TextError;
use docsift_domain::{segments_are_ordered, Metadata, SegmentationStrategy, TextSegment};
use serde_json::json;
use std::ops::Range;
use tracing::{debug, warn};

/// Claim threshold used when segmenting around claims
pub const CLAIM_SEGMENT_THRESHOLD: f64 = 0.3;

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Cuts cleaned text into ordered segments
#[derive(Debug, Clone, Default)]
pub struct TextSegmenter {
    detector: ClaimDetector,
}

impl TextSegmenter {
    /// Create a segmenter
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment `text` with `strategy`, keeping segments of at least `min_len`
    /// characters and splitting paragraphs longer than `max_len`
    pub fn segment(
        &self,
        text: &str,
        strategy: SegmentationStrategy,
        min_len: usize,
        max_len: usize,
    ) -> Vec<TextSegment> {
        let segments = match self.try_segment(text, strategy, min_len, max_len) {
            Ok(segments) => segments,
            Err(e) => {
                warn!("Segmentation with {} failed, using paragraphs: {}", strategy, e);
                return paragraphs(text, min_len, max_len);
            }
        };

        if !segments_are_ordered(&segments) {
            warn!("Segmentation with {} produced overlapping spans, using paragraphs", strategy);
            return paragraphs(text, min_len, max_len);
        }

        debug!("Segmented text into {} {} segments", segments.len(), strategy);
        segments
    }

    fn try_segment(
        &self,
        text: &str,
        strategy: SegmentationStrategy,
        min_len: usize,
        max_len: usize,
    ) -> Result<Vec<TextSegment>, TextError> {
        if min_len > max_len {
            return Err(TextError::InvalidOptions(format!(
                "min length {} exceeds max length {}",
                min_len, max_len
            )));
        }

        Ok(match strategy {
            SegmentationStrategy::Paragraph
            | SegmentationStrategy::Semantic
            | SegmentationStrategy::Topic => paragraphs(text, min_len, max_len),
            SegmentationStrategy::Sentence => sentence_groups(text, min_len, max_len),
            SegmentationStrategy::ClaimBased => self.claim_windows(text, min_len, max_len)?,
        })
    }

    fn claim_windows(
        &self,
        text: &str,
        min_len: usize,
        max_len: usize,
    ) -> Result<Vec<TextSegment>, TextError> {
        let claims = self.detector.detect(text, CLAIM_SEGMENT_THRESHOLD)?;
        if claims.is_empty() {
            debug!("No claims found, segmenting by paragraph");
            return Ok(paragraphs(text, min_len, max_len));
        }

        let mut segments = Vec::new();
        let mut last_end = 0;

        for claim in claims {
            let start = back_chars(text, claim.start, CONTEXT_CHARS).max(last_end);
            let start = sentence_start(text, start);
            let end = sentence_end(text, forward_chars(text, claim.end, CONTEXT_CHARS));

            if start < last_end {
                continue;
            }

            let span = trimmed(text, start..end);
            if text[span.clone()].chars().count() < min_len {
                continue;
            }

            let mut metadata = Metadata::new();
            metadata.insert("claim_text".into(), json!(claim.text));
            metadata.insert("claim_confidence".into(), json!(claim.confidence));
            segments.push(segment(text, span, "claim_context", claim.confidence, metadata));
            last_end = end;
        }

        Ok(segments)
    }
}

/// Paragraph segmentation; long paragraphs are split on sentence boundaries
pub fn paragraphs(text: &str, min_len: usize, max_len: usize) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut offset = 0;

    for block in text.split("\n\n") {
        let span = trimmed(text, offset..offset + block.len());
        offset += block.len() + 2;

        let len = text[span.clone()].chars().count();
        if len < min_len {
            continue;
        }

        if len > max_len {
            for chunk in sentence_chunks(text, span, max_len) {
                if text[chunk.clone()].chars().count() >= min_len {
                    segments.push(segment(text, chunk, "paragraph_split", 0.8, Metadata::new()));
                }
            }
        } else {
            segments.push(segment(text, span, "paragraph", 1.0, Metadata::new()));
        }
    }

    segments
}

/// Greedy sentence groups no longer than `max_len` characters
pub fn sentence_groups(text: &str, min_len: usize, max_len: usize) -> Vec<TextSegment> {
    sentence_chunks(text, 0..text.len(), max_len)
        .into_iter()
        .filter(|chunk| text[chunk.clone()].chars().count() >= min_len)
        .map(|chunk| segment(text, chunk, "sentence_group", 0.9, Metadata::new()))
        .collect()
}

/// Group the sentences inside `within` into spans of at most `max_len`
/// characters. A single sentence longer than `max_len` forms its own span.
fn sentence_chunks(text: &str, within: Range<usize>, max_len: usize) -> Vec<Range<usize>> {
    let scope = &text[within.clone()];
    let mut chunks = Vec::new();
    let mut current: Option<Range<usize>> = None;

    for sentence in sentence_spans(scope) {
        let start = within.start + sentence.start;
        let end = within.start + include_terminators(scope, sentence.end);

        current = Some(match current {
            None => start..end,
            Some(group) if text[group.start..end].chars().count() <= max_len => group.start..end,
            Some(group) => {
                chunks.push(group);
                start..end
            }
        });
    }

    chunks.extend(current);
    chunks
}

/// Advance `end` over a run of sentence terminators
fn include_terminators(text: &str, mut end: usize) -> usize {
    while let Some(c) = text[end..].chars().next() {
        if !TERMINATORS.contains(&c) {
            break;
        }
        end += c.len_utf8();
    }
    end
}

/// Walk back to the first character after a sentence terminator
fn sentence_start(text: &str, mut pos: usize) -> usize {
    while let Some(prev) = text[..pos].chars().next_back() {
        if TERMINATORS.contains(&prev) {
            break;
        }
        pos -= prev.len_utf8();
    }
    pos
}

/// Walk forward to just past the next sentence terminator
fn sentence_end(text: &str, mut pos: usize) -> usize {
    while let Some(c) = text[pos..].chars().next() {
        pos += c.len_utf8();
        if TERMINATORS.contains(&c) {
            break;
        }
    }
    pos
}

fn segment(
    text: &str,
    span: Range<usize>,
    kind: &str,
    confidence: f64,
    metadata: Metadata,
) -> TextSegment {
    TextSegment {
        text: text[span.clone()].to_string(),
        start: span.start,
        end: span.end,
        kind: kind.to_string(),
        confidence,
        metadata,
    }
}
