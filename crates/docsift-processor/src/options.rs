//! Per-request processing options

use docsift_domain::{ProcessingStrategy, SegmentationStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Shortest accepted request timeout (seconds)
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Longest accepted request timeout (seconds)
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Named quality bar for web extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// 0.3
    #[default]
    Low,
    /// 0.5
    Medium,
    /// 0.7
    High,
    /// 0.9
    Strict,
}

impl QualityLevel {
    /// All levels, lowest first
    pub const ALL: [QualityLevel; 4] = [
        QualityLevel::Low,
        QualityLevel::Medium,
        QualityLevel::High,
        QualityLevel::Strict,
    ];

    /// Numeric threshold in [0, 1]
    pub fn threshold(&self) -> f64 {
        match self {
            QualityLevel::Low => 0.3,
            QualityLevel::Medium => 0.5,
            QualityLevel::High => 0.7,
            QualityLevel::Strict => 0.9,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Low => "low",
            QualityLevel::Medium => "medium",
            QualityLevel::High => "high",
            QualityLevel::Strict => "strict",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityLevel::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown quality level: {}", s))
    }
}

/// Options for a single `process_document` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    /// Routing strategy; `auto` resolves from the input kind
    pub strategy: ProcessingStrategy,

    /// Quality bar used for web extraction
    pub quality_threshold: QualityLevel,

    /// Run OCR on PDFs even when the converter succeeds
    pub force_ocr: bool,

    /// Return images
    pub include_images: bool,

    /// Return tables
    pub include_tables: bool,

    /// Return collaborator and extraction metadata
    pub include_metadata: bool,

    /// Skip the cache lookup
    pub bypass_cache: bool,

    /// Overall request deadline (seconds)
    pub timeout_secs: u64,

    /// Largest accepted payload (bytes)
    pub max_file_size: usize,

    /// Run claim detection over the extracted text
    pub detect_claims: bool,

    /// How the extracted text is segmented
    pub segmentation_strategy: SegmentationStrategy,

    /// Minimum claim confidence
    pub claim_confidence_threshold: f64,

    /// PDF pages to OCR; all pages when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_pages: Option<Vec<u32>>,

    /// Language hint for OCR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_language: Option<String>,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            strategy: ProcessingStrategy::Auto,
            quality_threshold: QualityLevel::Low,
            force_ocr: false,
            include_images: false,
            include_tables: true,
            include_metadata: true,
            bypass_cache: false,
            timeout_secs: 120,
            max_file_size: 50 * 1024 * 1024,
            detect_claims: true,
            segmentation_strategy: SegmentationStrategy::Paragraph,
            claim_confidence_threshold: 0.5,
            ocr_pages: None,
            ocr_language: None,
        }
    }
}

impl ProcessingOptions {
    /// Request deadline as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(format!(
                "timeout_secs must be within [{}, {}], got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            ));
        }
        if self.max_file_size == 0 {
            return Err("max_file_size must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.claim_confidence_threshold) {
            return Err(format!(
                "claim_confidence_threshold must be within [0, 1], got {}",
                self.claim_confidence_threshold
            ));
        }
        Ok(())
    }

    /// The options as they take part in cache keys
    ///
    /// `bypass_cache` only controls the lookup, so it is normalized away and
    /// a bypassing request refreshes the entry normal requests read.
    pub fn cache_view(&self) -> Self {
        Self {
            bypass_cache: false,
            ..self.clone()
        }
    }
}
