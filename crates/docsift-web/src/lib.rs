//! Docsift Web Extraction
//!
//! Fetches a web page and extracts its main content with one of several
//! interchangeable engines, scoring each result and falling back to other
//! engines when the score stays under the requested threshold.
//!
//! # Architecture
//!
//! ```text
//! URL → validate → analyze_url → select engine → extract + score
//!                                      ↓ (score < threshold)
//!                               fallback engines → best result → ExtractedContent
//! ```
//!
//! # Engines
//!
//! | Strategy      | Feature       | Backed by                                          |
//! |---------------|---------------|----------------------------------------------------|
//! | `structured`  | `structured`  | `rs-trafilatura`, plus JSON-LD and OpenGraph meta  |
//! | `readability` | `readability` | `readabilityrs` (Mozilla Readability)              |
//! | `boilerplate` | `boilerplate` | `justext` with a `whatlang` chosen stop-word list  |
//! | `custom`      | always        | Selector cascade over the raw HTML                 |
//!
//! The engines compiled in, intersected with the configured allowlist, form the
//! [`EngineRegistry`]. It is built once and injected into the extractor.
//!
//! # Example Usage
//!
//! ```no_run
//! use docsift_web::UrlContentExtractor;
//! use docsift_domain::ExtractionOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = UrlContentExtractor::new();
//! let content = extractor
//!     .extract("https://example.com/article", &ExtractionOptions::default())
//!     .await?;
//!
//! println!("{} ({:.2})", content.title.unwrap_or_default(), content.quality_score);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod analyzer;
pub mod engines;
mod error;
mod extractor;
pub mod fetcher;
mod html;
pub mod mock;
pub mod quality;
mod registry;

#[cfg(test)]
mod tests;

pub use analyzer::{analyze_url, UrlAnalysis, UrlComponents};
pub use engines::{EngineOutput, ExtractionEngine};
pub use error::ExtractionError;
pub use extractor::UrlContentExtractor;
pub use fetcher::{FetchError, HttpFetcher, Page, PageFetcher};
pub use mock::StaticFetcher;
pub use registry::EngineRegistry;
