//! Text analysis values: segments, claims and structure metrics
//!
//! All `start`/`end` offsets are byte offsets into the cleaned text and always
//! fall on UTF-8 character boundaries.

use crate::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How text is cut into segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    /// Blank-line separated paragraphs
    #[default]
    Paragraph,
    /// Greedy groups of sentences
    Sentence,
    /// Reserved for embedding clustering; currently paragraph
    Semantic,
    /// Reserved for topic modelling; currently paragraph
    Topic,
    /// Windows around detected claims
    ClaimBased,
}

impl SegmentationStrategy {
    /// All strategies
    pub const ALL: [SegmentationStrategy; 5] = [
        SegmentationStrategy::Paragraph,
        SegmentationStrategy::Sentence,
        SegmentationStrategy::Semantic,
        SegmentationStrategy::Topic,
        SegmentationStrategy::ClaimBased,
    ];

    /// snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentationStrategy::Paragraph => "paragraph",
            SegmentationStrategy::Sentence => "sentence",
            SegmentationStrategy::Semantic => "semantic",
            SegmentationStrategy::Topic => "topic",
            SegmentationStrategy::ClaimBased => "claim_based",
        }
    }
}

impl fmt::Display for SegmentationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SegmentationStrategy::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown segmentation strategy: {}", s))
    }
}

/// A contiguous span of cleaned text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    /// Segment text, equal to `cleaned[start..end]`
    pub text: String,
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Segment kind, e.g. `paragraph` or `claim_context`
    pub kind: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Strategy-specific metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// A sentence flagged as a candidate factual claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialClaim {
    /// Sentence text
    pub text: String,
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Claim category
    pub claim_kind: String,
    /// Surrounding text window
    pub context: String,
    /// Stop-word filtered keywords
    pub keywords: Vec<String>,
    /// Naive proper-noun and organization entities
    pub entities: Vec<String>,
}

/// Detected language with alternatives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// ISO 639-1 code
    pub language: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Up to three `(code, probability)` candidates
    pub alternatives: Vec<(String, f64)>,
}

/// Structural metrics of a text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentStructure {
    /// Whether the first line looks like a title
    pub has_title: bool,
    /// Whether any heading was found
    pub has_headings: bool,
    /// Whether any paragraph was found
    pub has_paragraphs: bool,
    /// Whether any list item was found
    pub has_lists: bool,
    /// Whether any table row was found
    pub has_tables: bool,
    /// Blank-line separated blocks longer than 50 characters
    pub paragraph_count: usize,
    /// Short lines followed by a long line
    pub heading_count: usize,
    /// Bullet or number prefixed lines
    pub list_count: usize,
    /// Lines with at least two pipes
    pub table_count: usize,
    /// Whitespace separated words
    pub word_count: usize,
    /// Estimated reading time in minutes
    pub reading_time_minutes: f64,
    /// Complexity score in [0, 1]
    pub complexity_score: f64,
}

/// Output of the text processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedText {
    /// Input as given
    pub original_text: String,
    /// Cleaned text; all offsets refer to this
    pub cleaned_text: String,
    /// Detected language, if detection ran
    pub language: Option<LanguageInfo>,
    /// Structure metrics, if analysis ran
    pub structure: Option<ContentStructure>,
    /// Ordered, non-overlapping segments
    pub segments: Vec<TextSegment>,
    /// Candidate claims
    pub claims: Vec<PotentialClaim>,
    /// Lengths, counts, options and statistics
    pub processing_metadata: Metadata,
    /// Wall-clock time (seconds)
    pub processing_time: f64,
}

/// Check that segments are sorted by start and do not overlap
pub fn segments_are_ordered(segments: &[TextSegment]) -> bool {
    segments.iter().all(|s| s.start <= s.end)
        && segments.windows(2).all(|w| w[0].end <= w[1].start && w[0].start < w[1].start)
}
