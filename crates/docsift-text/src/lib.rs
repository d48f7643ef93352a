//! Docsift Text Analysis
//!
//! Turns raw text into a [`ProcessedText`](docsift_domain::ProcessedText):
//! cleaned text, language, structure metrics, ordered segments and candidate
//! factual claims.
//!
//! # Architecture
//!
//! ```text
//! text → clean → remove_boilerplate → { language, structure, segments, claims } → ProcessedText
//! ```
//!
//! Each analyzer is usable on its own. Analyzer failures degrade the result
//! (no language, no claims) instead of failing the pass; only invalid options
//! and too-short text are reported as errors.
//!
//! # Example Usage
//!
//! ```no_run
//! use docsift_text::{TextProcessor, TextProcessingOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let processor = TextProcessor::new();
//! let processed = processor
//!     .process_text(
//!         "Revenue increased by 12.5% in 2023 according to the annual report.",
//!         &TextProcessingOptions::default(),
//!     )
//!     .await?;
//!
//! println!("{} claims", processed.claims.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod claims;
pub mod cleaner;
mod config;
mod error;
pub mod language;
mod processor;
pub mod segmenter;
mod stats;
pub mod structure;

#[cfg(test)]
mod tests;

pub use claims::ClaimDetector;
pub use config::TextProcessingOptions;
pub use error::TextError;
pub use language::{
    language_code, supported_languages, FixedLanguageBackend, LanguageBackend, LanguageDetector,
    WhatlangBackend,
};
pub use processor::{KeyInformation, TextCapabilities, TextProcessor, MIN_TEXT_LENGTH};
pub use segmenter::TextSegmenter;
pub use stats::TextStatistics;
