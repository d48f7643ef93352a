//! Extraction engines
//!
//! Every engine fetches the page through the injected [`PageFetcher`], treats
//! HTTP statuses of 400 and above as failures, and reports an error when it
//! finds no text at all. Scoring goes through [`ExtractionEngine::assess_quality`],
//! which defaults to the shared heuristic in [`crate::quality`].
//!
//! The structured, readability and boilerplate engines adapt `rs-trafilatura`,
//! `readabilityrs` and `justext`; each sits behind the cargo feature of the
//! same name. The custom engine is a plain selector cascade.

#[cfg(feature = "boilerplate")]
mod boilerplate;
mod custom;
#[cfg(feature = "readability")]
mod readability;
#[cfg(feature = "structured")]
mod structured;

#[cfg(feature = "boilerplate")]
pub use boilerplate::BoilerplateEngine;
pub use custom::CustomEngine;
#[cfg(feature = "readability")]
pub use readability::ReadabilityEngine;
#[cfg(feature = "structured")]
pub use structured::StructuredEngine;

use crate::error::ExtractionError;
use crate::fetcher::{Page, PageFetcher};
use crate::quality;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docsift_domain::{ExtractionOptions, ExtractionStrategy, Metadata};
use std::sync::Arc;
use url::Url;

/// Raw output of one engine attempt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    /// Main text; paragraphs separated by blank lines
    pub text: String,
    /// Page title
    pub title: Option<String>,
    /// Author line
    pub author: Option<String>,
    /// Publication date
    pub publish_date: Option<DateTime<Utc>>,
    /// Absolute image URLs, at most ten
    pub images: Vec<String>,
    /// Absolute outbound links
    pub links: Vec<String>,
    /// Engine specific metadata
    pub metadata: Metadata,
}

/// An interchangeable content extraction algorithm
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Strategy this engine implements
    fn strategy(&self) -> ExtractionStrategy;

    /// Fetch `url` and extract its main content
    async fn extract(
        &self,
        url: &Url,
        options: &ExtractionOptions,
    ) -> Result<EngineOutput, ExtractionError>;

    /// Quality of `output` in [0, 1]
    fn assess_quality(&self, output: &EngineOutput) -> f64 {
        quality::assess(output)
    }
}

/// Construct the engine for `strategy` if it is compiled in
pub fn build(
    strategy: ExtractionStrategy,
    fetcher: Arc<dyn PageFetcher>,
) -> Option<Arc<dyn ExtractionEngine>> {
    match strategy {
        #[cfg(feature = "structured")]
        ExtractionStrategy::Structured => Some(Arc::new(StructuredEngine::new(fetcher))),
        #[cfg(feature = "readability")]
        ExtractionStrategy::Readability => Some(Arc::new(ReadabilityEngine::new(fetcher))),
        #[cfg(feature = "boilerplate")]
        ExtractionStrategy::Boilerplate => Some(Arc::new(BoilerplateEngine::new(fetcher))),
        ExtractionStrategy::Custom => Some(Arc::new(CustomEngine::new(fetcher))),
        _ => None,
    }
}

/// Strategies compiled into this build, in registry order
pub fn compiled_strategies() -> Vec<ExtractionStrategy> {
    let mut strategies = Vec::new();
    if cfg!(feature = "structured") {
        strategies.push(ExtractionStrategy::Structured);
    }
    if cfg!(feature = "readability") {
        strategies.push(ExtractionStrategy::Readability);
    }
    if cfg!(feature = "boilerplate") {
        strategies.push(ExtractionStrategy::Boilerplate);
    }
    strategies.push(ExtractionStrategy::Custom);
    strategies
}

/// Fetch a page, turning transport failures and HTTP errors into engine errors
pub(crate) async fn fetch_page(
    fetcher: &dyn PageFetcher,
    strategy: ExtractionStrategy,
    url: &Url,
    options: &ExtractionOptions,
) -> Result<Page, ExtractionError> {
    let page = fetcher
        .fetch(url, options)
        .await
        .map_err(|e| ExtractionError::Engine {
            strategy,
            url: url.to_string(),
            status_code: None,
            message: e.to_string(),
        })?;

    if page.is_error() {
        return Err(ExtractionError::Engine {
            strategy,
            url: url.to_string(),
            status_code: Some(page.status),
            message: format!("HTTP {}", page.status),
        });
    }
    Ok(page)
}

/// Engine failure not tied to an HTTP status
pub(crate) fn engine_failure(
    strategy: ExtractionStrategy,
    url: &Url,
    message: impl Into<String>,
) -> ExtractionError {
    ExtractionError::Engine {
        strategy,
        url: url.to_string(),
        status_code: None,
        message: message.into(),
    }
}

/// Reject output without any text
pub(crate) fn require_text(
    output: EngineOutput,
    strategy: ExtractionStrategy,
    url: &Url,
) -> Result<EngineOutput, ExtractionError> {
    if output.text.trim().is_empty() {
        return Err(engine_failure(strategy, url, "no content found"));
    }
    Ok(output)
}
