//! Configuration for the text processor

use docsift_domain::SegmentationStrategy;
use serde::{Deserialize, Serialize};

/// Smallest accepted `min_segment_length`
pub const MIN_SEGMENT_FLOOR: usize = 10;

/// Smallest accepted `max_segment_length`
pub const MAX_SEGMENT_FLOOR: usize = 100;

/// Largest accepted segment length
pub const SEGMENT_CEILING: usize = 10_000;

/// Options for a single `process_text` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProcessingOptions {
    /// How to cut the cleaned text into segments
    pub segmentation_strategy: SegmentationStrategy,

    /// Run language detection
    pub detect_language: bool,

    /// Run claim detection
    pub detect_claims: bool,

    /// Run structure analysis
    pub analyze_structure: bool,

    /// Segments shorter than this (characters) are dropped
    pub min_segment_length: usize,

    /// Paragraphs longer than this (characters) are split
    pub max_segment_length: usize,

    /// Minimum claim confidence
    pub claim_confidence_threshold: f64,

    /// Attach text statistics to the processing metadata
    pub include_statistics: bool,
}

impl Default for TextProcessingOptions {
    fn default() -> Self {
        Self {
            segmentation_strategy: SegmentationStrategy::Paragraph,
            detect_language: true,
            detect_claims: true,
            analyze_structure: true,
            min_segment_length: 50,
            max_segment_length: 5000,
            claim_confidence_threshold: 0.5,
            include_statistics: true,
        }
    }
}

impl TextProcessingOptions {
    /// Validate the options
    pub fn validate(&self) -> Result<(), String> {
        if self.min_segment_length < MIN_SEGMENT_FLOOR {
            return Err(format!(
                "min_segment_length must be at least {}",
                MIN_SEGMENT_FLOOR
            ));
        }
        if self.max_segment_length < MAX_SEGMENT_FLOOR {
            return Err(format!(
                "max_segment_length must be at least {}",
                MAX_SEGMENT_FLOOR
            ));
        }
        if self.max_segment_length > SEGMENT_CEILING {
            return Err(format!(
                "max_segment_length cannot exceed {}",
                SEGMENT_CEILING
            ));
        }
        if self.min_segment_length > self.max_segment_length {
            return Err("min_segment_length cannot exceed max_segment_length".to_string());
        }
        if !(0.0..=1.0).contains(&self.claim_confidence_threshold) {
            return Err("claim_confidence_threshold must be within [0, 1]".to_string());
        }
        Ok(())
    }

    /// Load options from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(TextProcessingOptions::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_segment_bounds() {
        let mut options = TextProcessingOptions::default();
        options.min_segment_length = 5;
        assert!(options.validate().is_err());

        let mut options = TextProcessingOptions::default();
        options.min_segment_length = 500;
        options.max_segment_length = 200;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut options = TextProcessingOptions::default();
        options.claim_confidence_threshold = -0.1;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let options = TextProcessingOptions::from_toml(
            "segmentation_strategy = \"claim_based\"\nmin_segment_length = 20\n",
        )
        .unwrap();
        assert_eq!(options.segmentation_strategy, SegmentationStrategy::ClaimBased);
        assert_eq!(options.min_segment_length, 20);
        assert_eq!(options.max_segment_length, 5000);
    }
}
