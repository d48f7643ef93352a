//! Unified processor output

use crate::{InputKind, Metadata, PotentialClaim, TextSegment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Routing strategy for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStrategy {
    /// Pick based on the input kind
    #[default]
    Auto,
    /// Document converter only
    ConverterOnly,
    /// OCR only
    OcrOnly,
    /// Converter, then OCR if needed, merged by quality
    Hybrid,
    /// Web extraction
    UrlExtraction,
    /// Text processor only
    TextAnalysis,
}

impl ProcessingStrategy {
    /// All strategies
    pub const ALL: [ProcessingStrategy; 6] = [
        ProcessingStrategy::Auto,
        ProcessingStrategy::ConverterOnly,
        ProcessingStrategy::OcrOnly,
        ProcessingStrategy::Hybrid,
        ProcessingStrategy::UrlExtraction,
        ProcessingStrategy::TextAnalysis,
    ];

    /// The strategy `Auto` resolves to for an input kind
    pub fn for_kind(kind: InputKind) -> Self {
        match kind {
            InputKind::Pdf => ProcessingStrategy::Hybrid,
            InputKind::Doc | InputKind::Docx => ProcessingStrategy::ConverterOnly,
            InputKind::Image => ProcessingStrategy::OcrOnly,
            InputKind::Url => ProcessingStrategy::UrlExtraction,
            InputKind::Txt | InputKind::Text => ProcessingStrategy::TextAnalysis,
        }
    }

    /// snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStrategy::Auto => "auto",
            ProcessingStrategy::ConverterOnly => "converter_only",
            ProcessingStrategy::OcrOnly => "ocr_only",
            ProcessingStrategy::Hybrid => "hybrid",
            ProcessingStrategy::UrlExtraction => "url_extraction",
            ProcessingStrategy::TextAnalysis => "text_analysis",
        }
    }
}

impl fmt::Display for ProcessingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessingStrategy::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown processing strategy: {}", s))
    }
}

/// Timing, counts and quality figures for one request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Total wall-clock time (seconds)
    pub processing_time: f64,
    /// Processor names in invocation order
    pub processors_used: Vec<String>,
    /// Payload size in bytes
    pub input_size: usize,
    /// Output text size in characters
    pub output_size: usize,
    /// Overall confidence in [0, 1]
    pub confidence_score: f64,
    /// Overall quality in [0, 1]
    pub quality_score: f64,
    /// Time spent in the document converter
    pub converter_time: Option<f64>,
    /// Time spent in OCR
    pub ocr_time: Option<f64>,
    /// Time spent in the text processor
    pub text_processing_time: Option<f64>,
    /// Time spent in web extraction
    pub url_extraction_time: Option<f64>,
    /// Page count reported by a collaborator
    pub page_count: Option<u64>,
    /// Words in the output text
    pub word_count: usize,
    /// Characters in the output text
    pub character_count: usize,
    /// Tables returned
    pub table_count: usize,
    /// Images returned
    pub image_count: usize,
    /// Claims detected
    pub claim_count: usize,
    /// Text quality estimate
    pub text_quality: Option<f64>,
    /// Structure quality estimate
    pub structure_quality: Option<f64>,
    /// OCR confidence
    pub ocr_confidence: Option<f64>,
}

/// Unified output of the document processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Request identifier (UUIDv7)
    pub processing_id: Uuid,
    /// Whether processing produced a usable result
    pub success: bool,
    /// Kind of the submitted payload
    pub input_kind: InputKind,
    /// Strategy actually applied
    pub strategy_used: ProcessingStrategy,
    /// Extracted plain text
    pub text: String,
    /// Markdown rendering, when a collaborator produced one
    pub markdown: Option<String>,
    /// Collaborator structured content
    pub structured_content: Option<serde_json::Value>,
    /// Extracted tables
    pub tables: Vec<serde_json::Value>,
    /// Extracted images
    pub images: Vec<serde_json::Value>,
    /// Extracted links
    pub links: Vec<String>,
    /// Ordered, non-overlapping segments
    pub segments: Vec<TextSegment>,
    /// Candidate claims
    pub claims: Vec<PotentialClaim>,
    /// Merged metadata
    pub metadata: Metadata,
    /// Detected language code
    pub language: Option<String>,
    /// Timing and counts
    pub processing_stats: ProcessingStats,
    /// Non-fatal problems
    pub warnings: Vec<String>,
    /// Fatal problems; non-empty iff `success` is false
    pub errors: Vec<String>,
    /// Whether this result was served from the cache
    pub cache_hit: bool,
    /// Completion timestamp
    pub processed_at: DateTime<Utc>,
}

impl ProcessingResult {
    /// Empty result for the given input, not yet successful
    pub fn new(input_kind: InputKind, strategy_used: ProcessingStrategy) -> Self {
        Self {
            processing_id: Uuid::now_v7(),
            success: false,
            input_kind,
            strategy_used,
            text: String::new(),
            markdown: None,
            structured_content: None,
            tables: Vec::new(),
            images: Vec::new(),
            links: Vec::new(),
            segments: Vec::new(),
            claims: Vec::new(),
            metadata: Metadata::new(),
            language: None,
            processing_stats: ProcessingStats::default(),
            warnings: Vec::new(),
            errors: Vec::new(),
            cache_hit: false,
            processed_at: Utc::now(),
        }
    }

    /// Failed result carrying one error message
    pub fn failure(
        input_kind: InputKind,
        strategy_used: ProcessingStrategy,
        error: impl Into<String>,
    ) -> Self {
        let mut result = Self::new(input_kind, strategy_used);
        result.errors.push(error.into());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_resolution() {
        assert_eq!(ProcessingStrategy::for_kind(InputKind::Pdf), ProcessingStrategy::Hybrid);
        assert_eq!(
            ProcessingStrategy::for_kind(InputKind::Docx),
            ProcessingStrategy::ConverterOnly
        );
        assert_eq!(ProcessingStrategy::for_kind(InputKind::Image), ProcessingStrategy::OcrOnly);
        assert_eq!(
            ProcessingStrategy::for_kind(InputKind::Url),
            ProcessingStrategy::UrlExtraction
        );
        assert_eq!(
            ProcessingStrategy::for_kind(InputKind::Txt),
            ProcessingStrategy::TextAnalysis
        );
    }

    #[test]
    fn test_failure_result() {
        let result = ProcessingResult::failure(InputKind::Text, ProcessingStrategy::Auto, "boom");
        assert!(!result.success);
        assert_eq!(result.errors, vec!["boom".to_string()]);
        assert!(!result.cache_hit);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ProcessingResult::new(InputKind::Text, ProcessingStrategy::Auto);
        let b = ProcessingResult::new(InputKind::Text, ProcessingStrategy::Auto);
        assert_ne!(a.processing_id, b.processing_id);
    }
}
