//! Text processor composing the analyzers into one pass

use crate::claims::ClaimDetector;
use crate::cleaner;
use crate::config::{TextProcessingOptions, MIN_SEGMENT_FLOOR, SEGMENT_CEILING};
use crate::error::TextError;
use crate::language::{self, LanguageBackend, LanguageDetector};
use crate::segmenter::TextSegmenter;
use crate::stats::TextStatistics;
use crate::structure;
use docsift_domain::{Metadata, PotentialClaim, ProcessedText, SegmentationStrategy};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Minimum characters before and after cleaning
pub const MIN_TEXT_LENGTH: usize = 10;

/// Maximum characters accepted by the processor
pub const MAX_TEXT_LENGTH: usize = 1_000_000;

/// Claim threshold used for key information extraction
pub const KEY_INFO_THRESHOLD: f64 = 0.3;

/// Confidence from which a claim counts as high confidence
pub const HIGH_CONFIDENCE: f64 = 0.7;

/// Fact-checking summary of a text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyInformation {
    /// Claims found at the low threshold
    pub total_claims: usize,
    /// Claims at or above the high-confidence mark
    pub high_confidence_claims: usize,
    /// Up to ten high-confidence claims
    pub claims: Vec<PotentialClaim>,
    /// Up to twenty keywords across all claims
    pub keywords: Vec<String>,
    /// Up to fifteen entities across all claims
    pub entities: Vec<String>,
    /// Detected language, `unknown` when detection did not run
    pub language: String,
    /// Complexity score of the cleaned text
    pub complexity_score: f64,
    /// Reading time in minutes
    pub estimated_reading_time: f64,
    /// Failure message when extraction failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What the text processor can do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCapabilities {
    /// Supported segmentation strategies
    pub segmentation_strategies: Vec<SegmentationStrategy>,
    /// Whether a language backend is configured
    pub language_detection_available: bool,
    /// Languages the default backend recognizes
    pub supported_languages: Vec<String>,
    /// Maximum accepted text length (characters)
    pub max_text_length: usize,
    /// Smallest accepted minimum segment length
    pub min_segment_length: usize,
    /// Largest accepted segment length
    pub max_segment_length: usize,
}

/// Cleans text and runs language, structure, segmentation and claim analysis
#[derive(Clone, Default)]
pub struct TextProcessor {
    language: LanguageDetector,
    claims: ClaimDetector,
    segmenter: TextSegmenter,
}

impl TextProcessor {
    /// Processor with the built-in language backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor with a custom language backend
    pub fn with_language_backend(backend: Arc<dyn LanguageBackend>) -> Self {
        Self {
            language: LanguageDetector::new(backend),
            ..Self::default()
        }
    }

    /// Processor without any language backend
    pub fn without_language_backend() -> Self {
        Self {
            language: LanguageDetector::without_backend(),
            ..Self::default()
        }
    }

    /// Process `text` on the blocking pool
    pub async fn process_text(
        &self,
        text: &str,
        options: &TextProcessingOptions,
    ) -> Result<ProcessedText, TextError> {
        let processor = self.clone();
        let text = text.to_string();
        let options = options.clone();
        tokio::task::spawn_blocking(move || processor.process(&text, &options))
            .await
            .map_err(|e| TextError::Processing(format!("Text processing task failed: {}", e)))?
    }

    /// Clean and analyze `text`
    ///
    /// # Errors
    ///
    /// - [`TextError::InvalidOptions`] if the options fail validation
    /// - [`TextError::TextTooShort`] if fewer than ten characters remain
    ///   before or after cleaning
    pub fn process(
        &self,
        text: &str,
        options: &TextProcessingOptions,
    ) -> Result<ProcessedText, TextError> {
        let started = Instant::now();
        options.validate().map_err(TextError::InvalidOptions)?;

        let trimmed_len = text.trim().chars().count();
        if trimmed_len < MIN_TEXT_LENGTH {
            return Err(TextError::TextTooShort {
                length: trimmed_len,
                stage: "before cleaning",
            });
        }
        let original_len = text.chars().count();
        if original_len > MAX_TEXT_LENGTH {
            return Err(TextError::InvalidOptions(format!(
                "text of {} chars exceeds maximum of {}",
                original_len, MAX_TEXT_LENGTH
            )));
        }

        let cleaned = cleaner::remove_boilerplate(&cleaner::clean(text));
        let cleaned_len = cleaned.chars().count();
        if cleaned_len < MIN_TEXT_LENGTH {
            return Err(TextError::TextTooShort {
                length: cleaned_len,
                stage: "after cleaning",
            });
        }

        let language = options
            .detect_language
            .then(|| self.language.detect(&cleaned));

        let structure = options
            .analyze_structure
            .then(|| structure::analyze(&cleaned));

        let segments = self.segmenter.segment(
            &cleaned,
            options.segmentation_strategy,
            options.min_segment_length,
            options.max_segment_length,
        );

        let claims = if options.detect_claims {
            self.claims
                .detect(&cleaned, options.claim_confidence_threshold)
                .unwrap_or_else(|e| {
                    warn!("Claim detection failed, continuing without claims: {}", e);
                    Vec::new()
                })
        } else {
            Vec::new()
        };

        let mut metadata = Metadata::new();
        metadata.insert("original_length".into(), json!(original_len));
        metadata.insert("cleaned_length".into(), json!(cleaned_len));
        metadata.insert(
            "reduction_ratio".into(),
            json!(1.0 - cleaned_len as f64 / original_len as f64),
        );
        metadata.insert("processing_options".into(), json!(options));
        metadata.insert("segments_count".into(), json!(segments.len()));
        metadata.insert("claims_count".into(), json!(claims.len()));
        metadata.insert(
            "language_detected".into(),
            json!(language.as_ref().map(|l| l.language.clone())),
        );
        metadata.insert(
            "language_confidence".into(),
            json!(language.as_ref().map(|l| l.confidence)),
        );
        if options.include_statistics {
            if let serde_json::Value::Object(stats) = json!(TextStatistics::compute(&cleaned)) {
                metadata.extend(stats);
            }
        }

        let processing_time = started.elapsed().as_secs_f64();
        info!(
            "Text processing completed in {:.3}s ({} segments, {} claims)",
            processing_time,
            segments.len(),
            claims.len()
        );

        Ok(ProcessedText {
            original_text: text.to_string(),
            cleaned_text: cleaned,
            language,
            structure,
            segments,
            claims,
            processing_metadata: metadata,
            processing_time,
        })
    }

    /// Summarize claims, keywords and entities for fact checking
    ///
    /// Never fails; problems are reported in [`KeyInformation::error`].
    pub async fn extract_key_information(&self, text: &str) -> KeyInformation {
        let options = TextProcessingOptions {
            detect_claims: true,
            claim_confidence_threshold: KEY_INFO_THRESHOLD,
            segmentation_strategy: SegmentationStrategy::ClaimBased,
            ..TextProcessingOptions::default()
        };

        let processed = match self.process_text(text, &options).await {
            Ok(processed) => processed,
            Err(e) => {
                error!("Key information extraction failed: {}", e);
                return KeyInformation {
                    language: "unknown".to_string(),
                    error: Some(e.to_string()),
                    ..KeyInformation::default()
                };
            }
        };

        let mut keywords: Vec<String> = Vec::new();
        let mut entities: Vec<String> = Vec::new();
        for claim in &processed.claims {
            for keyword in &claim.keywords {
                if !keywords.contains(keyword) {
                    keywords.push(keyword.clone());
                }
            }
            for entity in &claim.entities {
                if !entities.contains(entity) {
                    entities.push(entity.clone());
                }
            }
        }
        keywords.truncate(20);
        entities.truncate(15);

        let high: Vec<PotentialClaim> = processed
            .claims
            .iter()
            .filter(|c| c.confidence >= HIGH_CONFIDENCE)
            .cloned()
            .collect();
        let structure = processed.structure.unwrap_or_default();

        KeyInformation {
            total_claims: processed.claims.len(),
            high_confidence_claims: high.len(),
            claims: high.into_iter().take(10).collect(),
            keywords,
            entities,
            language: processed
                .language
                .map(|l| l.language)
                .unwrap_or_else(|| "unknown".to_string()),
            complexity_score: structure.complexity_score,
            estimated_reading_time: structure.reading_time_minutes,
            error: None,
        }
    }

    /// Capability report
    pub fn capabilities(&self) -> TextCapabilities {
        TextCapabilities {
            segmentation_strategies: SegmentationStrategy::ALL.to_vec(),
            language_detection_available: self.language.has_backend(),
            supported_languages: language::supported_languages(),
            max_text_length: MAX_TEXT_LENGTH,
            min_segment_length: MIN_SEGMENT_FLOOR,
            max_segment_length: SEGMENT_CEILING,
        }
    }
}
