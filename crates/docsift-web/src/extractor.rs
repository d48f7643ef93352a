//! URL content extraction with strategy selection and fallback

use crate::analyzer::{analyze_url, UrlAnalysis};
use crate::engines::{EngineOutput, ExtractionEngine};
use crate::error::ExtractionError;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::registry::EngineRegistry;
use docsift_domain::{
    ContentType, Deadline, ExtractedContent, ExtractionOptions, ExtractionStrategy,
};
use docsift_text::LanguageDetector;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Initial engine order when the content type gives no preference
pub const PRIORITY: [ExtractionStrategy; 4] = [
    ExtractionStrategy::Boilerplate,
    ExtractionStrategy::Structured,
    ExtractionStrategy::Readability,
    ExtractionStrategy::Custom,
];

/// A successful engine attempt with its score
struct Scored {
    strategy: ExtractionStrategy,
    output: EngineOutput,
    score: f64,
}

/// Outcome of one engine attempt that did not hit the overall deadline
enum Attempt {
    Succeeded(Scored),
    Failed(String),
}

/// Extracts the main content of web pages
///
/// Holds the engine registry and language detector; cheap to share behind an
/// `Arc` and safe to use from concurrent requests.
#[derive(Clone)]
pub struct UrlContentExtractor {
    registry: EngineRegistry,
    language: LanguageDetector,
}

impl Default for UrlContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlContentExtractor {
    /// Extractor with every compiled-in engine over HTTP
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(HttpFetcher::new()))
    }

    /// Extractor with every compiled-in engine over `fetcher`
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_registry(EngineRegistry::new(fetcher))
    }

    /// Extractor over an explicit registry
    pub fn with_registry(registry: EngineRegistry) -> Self {
        Self {
            registry,
            language: LanguageDetector::default(),
        }
    }

    /// Replace the language detector
    pub fn with_language_detector(mut self, language: LanguageDetector) -> Self {
        self.language = language;
        self
    }

    /// Strategies that can be used, in registry order
    pub fn available_strategies(&self) -> Vec<ExtractionStrategy> {
        self.registry.available_strategies()
    }

    /// Whether `strategy` can be used
    pub fn is_strategy_available(&self, strategy: ExtractionStrategy) -> bool {
        self.registry.is_available(strategy)
    }

    /// Choose the initial engine
    ///
    /// An explicit request wins when that engine is available. Otherwise news
    /// prefers `structured`, blogs and papers prefer `boilerplate`, and
    /// everything else follows [`PRIORITY`].
    pub fn select_strategy(
        &self,
        requested: ExtractionStrategy,
        content_type: ContentType,
    ) -> Result<ExtractionStrategy, ExtractionError> {
        if requested != ExtractionStrategy::Auto {
            if self.registry.is_available(requested) {
                return Ok(requested);
            }
            warn!(
                "Requested strategy {} not available, selecting automatically",
                requested
            );
        }

        let preferred = match content_type {
            ContentType::NewsArticle => Some(ExtractionStrategy::Structured),
            ContentType::BlogPost | ContentType::AcademicPaper => {
                Some(ExtractionStrategy::Boilerplate)
            }
            _ => None,
        };

        preferred
            .into_iter()
            .chain(PRIORITY)
            .find(|s| self.registry.is_available(*s))
            .ok_or(ExtractionError::NoEngineAvailable)
    }

    /// Extract `url` under the overall timeout from `options`
    pub async fn extract(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractedContent, ExtractionError> {
        self.extract_until(url, options, Deadline::after(options.timeout()))
            .await
    }

    /// Extract `url`, finishing by the earlier of `deadline` and the options' timeout
    pub async fn extract_until(
        &self,
        url: &str,
        options: &ExtractionOptions,
        deadline: Deadline,
    ) -> Result<ExtractedContent, ExtractionError> {
        let started = Instant::now();
        options.validate().map_err(ExtractionError::InvalidOptions)?;
        let deadline = deadline.capped(options.timeout());

        let parsed = parse_url(url)?;
        let analysis = analyze_url(&parsed);
        let initial = self.select_strategy(options.strategy, analysis.content_type)?;
        info!(
            "Extracting {} with {} ({:?})",
            parsed, initial, analysis.content_type
        );

        let mut attempts = 0;
        let mut last_error = String::new();
        let mut best: Option<Scored> = None;

        attempts += 1;
        match self.attempt(initial, &parsed, options, deadline).await? {
            Attempt::Succeeded(scored) => best = Some(scored),
            Attempt::Failed(message) => last_error = message,
        }

        let fallbacks: Vec<ExtractionStrategy> = self
            .registry
            .available_strategies()
            .into_iter()
            .filter(|s| *s != initial)
            .collect();

        for strategy in fallbacks {
            if best
                .as_ref()
                .is_some_and(|b| b.score >= options.quality_threshold)
            {
                break;
            }
            debug!("Trying fallback strategy {}", strategy);
            attempts += 1;
            match self.attempt(strategy, &parsed, options, deadline).await? {
                Attempt::Succeeded(scored) => {
                    let improves = best.as_ref().map_or(true, |b| scored.score > b.score);
                    if improves {
                        info!(
                            "Fallback {} improved quality to {:.2}",
                            strategy, scored.score
                        );
                        best = Some(scored);
                    }
                }
                Attempt::Failed(message) => last_error = message,
            }
        }

        let Some(best) = best else {
            return Err(ExtractionError::AllEnginesFailed {
                url: url.to_string(),
                attempts,
                last_error,
            });
        };

        if best.score < options.quality_threshold {
            return Err(ExtractionError::QualityBelowThreshold {
                url: url.to_string(),
                achieved: best.score,
                threshold: options.quality_threshold,
            });
        }

        let content = self.finish(url, best, analysis, attempts, options, started);
        info!(
            "Extracted {} chars from {} with {} (quality {:.2})",
            content.text.chars().count(),
            url,
            content.strategy_used,
            content.quality_score
        );
        Ok(content)
    }

    async fn attempt(
        &self,
        strategy: ExtractionStrategy,
        url: &Url,
        options: &ExtractionOptions,
        deadline: Deadline,
    ) -> Result<Attempt, ExtractionError> {
        let Some(engine) = self.registry.get(strategy) else {
            return Ok(Attempt::Failed(format!("{} not available", strategy)));
        };

        let attempt_deadline = deadline.capped(options.engine_timeout());
        match attempt_deadline.run(engine.extract(url, options)).await {
            Ok(Ok(output)) => {
                let score = engine.assess_quality(&output).clamp(0.0, 1.0);
                debug!("{} scored {:.2} for {}", strategy, score, url);
                Ok(Attempt::Succeeded(Scored {
                    strategy,
                    output,
                    score,
                }))
            }
            Ok(Err(e)) => {
                warn!("{} extraction failed: {}", strategy, e);
                Ok(Attempt::Failed(e.to_string()))
            }
            Err(_) if deadline.is_expired() => Err(ExtractionError::Timeout {
                url: url.to_string(),
                timeout_secs: options.timeout_secs,
            }),
            Err(_) => {
                let message = format!(
                    "{} timed out after {}s",
                    strategy,
                    options.engine_timeout().as_secs()
                );
                warn!("{}", message);
                Ok(Attempt::Failed(message))
            }
        }
    }

    fn finish(
        &self,
        url: &str,
        best: Scored,
        analysis: UrlAnalysis,
        attempts: usize,
        options: &ExtractionOptions,
        started: Instant,
    ) -> ExtractedContent {
        let Scored {
            strategy,
            output,
            score,
        } = best;

        let text = truncate_chars(output.text, options.max_content_length);
        let language = (options.include_metadata && !text.is_empty())
            .then(|| self.language.detect(&text).language);

        let content_type = analysis.content_type;
        let mut metadata = output.metadata;
        metadata.insert("url_analysis".into(), json!(analysis));
        metadata.insert("extraction_attempts".into(), json!(attempts));

        ExtractedContent {
            url: url.to_string(),
            title: output.title,
            text,
            author: output.author,
            publish_date: output.publish_date,
            strategy_used: strategy,
            content_type,
            quality_score: score,
            language,
            images: if options.include_images {
                output.images
            } else {
                Vec::new()
            },
            links: if options.include_links {
                output.links
            } else {
                Vec::new()
            },
            metadata,
            processing_time: started.elapsed().as_secs_f64(),
        }
    }
}

/// Parse `raw` as an absolute http(s) URL with a host
pub fn parse_url(raw: &str) -> Result<Url, ExtractionError> {
    let invalid = |reason: String| ExtractionError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com/a").is_ok());
        assert!(matches!(
            parse_url("not a url"),
            Err(ExtractionError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_url("ftp://example.com/file"),
            Err(ExtractionError::InvalidUrl { .. })
        ));
        assert!(parse_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo".to_string(), 2), "hé");
        assert_eq!(truncate_chars("abc".to_string(), 10), "abc");
    }

    #[test]
    fn test_select_strategy() {
        let extractor = UrlContentExtractor::with_fetcher(Arc::new(crate::StaticFetcher::new()));
        let available = extractor.available_strategies();

        let custom = extractor
            .select_strategy(ExtractionStrategy::Custom, ContentType::NewsArticle)
            .unwrap();
        assert_eq!(custom, ExtractionStrategy::Custom);

        let news = extractor
            .select_strategy(ExtractionStrategy::Auto, ContentType::NewsArticle)
            .unwrap();
        if available.contains(&ExtractionStrategy::Structured) {
            assert_eq!(news, ExtractionStrategy::Structured);
        }

        let general = extractor
            .select_strategy(ExtractionStrategy::Auto, ContentType::General)
            .unwrap();
        let expected = PRIORITY.into_iter().find(|s| available.contains(s)).unwrap();
        assert_eq!(general, expected);
    }

    #[test]
    fn test_select_without_engines() {
        let extractor = UrlContentExtractor::with_registry(EngineRegistry::from_engines(vec![]));
        assert_eq!(
            extractor.select_strategy(ExtractionStrategy::Auto, ContentType::General),
            Err(ExtractionError::NoEngineAvailable)
        );
    }
}
