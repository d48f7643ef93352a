//! Integration tests for URL extraction

#[cfg(test)]
mod tests {
    use crate::{
        quality, EngineOutput, EngineRegistry, ExtractionEngine, ExtractionError, StaticFetcher,
        UrlContentExtractor,
    };
    use async_trait::async_trait;
    use docsift_domain::{ContentType, ErrorKind, ExtractionOptions, ExtractionStrategy};
    use docsift_text::{FixedLanguageBackend, LanguageDetector};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;

    const NEWS_PAGE: &str = r#"<html><head>
        <title>Harbour traffic reaches record levels | Example CNN</title>
        <meta name="author" content="Maria Silva">
        <meta property="article:published_time" content="2024-06-03T07:00:00Z">
        </head><body>
        <nav><a href="/">Home</a></nav>
        <article>
          <p>Harbour traffic reached a record level in May, according to figures released by the port authority on Monday. The number of container ships that arrived was the highest since the port opened.</p>
          <p>Officials said that new berths and longer opening hours had made the difference, and they expect the trend to continue for the rest of the year as trade with Asia grows.</p>
        </article>
        </body></html>"#;

    /// Engine with a canned result, score and latency
    struct FixedEngine {
        strategy: ExtractionStrategy,
        text: Option<&'static str>,
        score: f64,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl FixedEngine {
        fn new(strategy: ExtractionStrategy, score: f64) -> Self {
            Self {
                strategy,
                text: Some("Some extracted text for the page."),
                score,
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(strategy: ExtractionStrategy) -> Self {
            Self {
                text: None,
                ..Self::new(strategy, 0.0)
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl ExtractionEngine for FixedEngine {
        fn strategy(&self) -> ExtractionStrategy {
            self.strategy
        }

        async fn extract(
            &self,
            url: &Url,
            _options: &ExtractionOptions,
        ) -> Result<EngineOutput, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.text {
                Some(text) => Ok(EngineOutput {
                    text: text.to_string(),
                    ..EngineOutput::default()
                }),
                None => Err(ExtractionError::Engine {
                    strategy: self.strategy,
                    url: url.to_string(),
                    status_code: Some(503),
                    message: "HTTP 503".to_string(),
                }),
            }
        }

        fn assess_quality(&self, _output: &EngineOutput) -> f64 {
            self.score
        }
    }

    fn extractor(engines: Vec<FixedEngine>) -> (UrlContentExtractor, Vec<Arc<AtomicUsize>>) {
        let calls = engines.iter().map(|e| e.calls.clone()).collect();
        let engines: Vec<Arc<dyn ExtractionEngine>> = engines
            .into_iter()
            .map(|e| Arc::new(e) as Arc<dyn ExtractionEngine>)
            .collect();
        let extractor = UrlContentExtractor::with_registry(EngineRegistry::from_engines(engines))
            .with_language_detector(LanguageDetector::new(Arc::new(FixedLanguageBackend::new(
                "en", 0.99,
            ))));
        (extractor, calls)
    }

    fn options(threshold: f64) -> ExtractionOptions {
        ExtractionOptions {
            quality_threshold: threshold,
            ..Default::default()
        }
    }

    const URL: &str = "https://www.example.org/page";

    #[tokio::test]
    async fn test_news_url_is_classified_and_extracted() {
        let url = "https://news.example-cnn.com/story";
        let fetcher = StaticFetcher::new();
        fetcher.add_page(url, NEWS_PAGE);
        let extractor = UrlContentExtractor::with_fetcher(Arc::new(fetcher));

        let content = extractor.extract(url, &options(0.3)).await.unwrap();
        assert_eq!(content.content_type, ContentType::NewsArticle);
        assert_eq!(content.metadata["url_analysis"]["trust_score"], 0.8);
        assert_eq!(content.metadata["url_analysis"]["content_type"], "NEWS_ARTICLE");
        assert!(content.text.contains("Harbour traffic reached a record level"));
        assert!(!content.text.contains("Home"));
        assert_eq!(content.author.as_deref(), Some("Maria Silva"));
        assert!((0.0..=1.0).contains(&content.quality_score));
        assert_eq!(content.language.as_deref(), Some("en"));
        assert!(content.images.is_empty());
        if extractor.is_strategy_available(ExtractionStrategy::Structured) {
            assert_eq!(content.strategy_used, ExtractionStrategy::Structured);
        }
    }

    #[tokio::test]
    async fn test_short_page_below_strict_threshold() {
        let url = "https://www.example.org/tiny";
        let fetcher = StaticFetcher::new();
        fetcher.add_page(
            url,
            "<html><body><p>Tiny page body with only a few words</p></body></html>",
        );
        let extractor = UrlContentExtractor::with_fetcher(Arc::new(fetcher.clone()));

        let err = extractor.extract(url, &options(0.95)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QualityBelowThreshold);
        match err {
            ExtractionError::QualityBelowThreshold {
                achieved,
                threshold,
                ..
            } => {
                assert!(achieved < 0.95);
                assert_eq!(threshold, 0.95);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // every available engine was tried
        assert_eq!(fetcher.call_count(), extractor.available_strategies().len());
    }

    #[tokio::test]
    async fn test_fallback_switches_on_first_improvement_above_threshold() {
        let (extractor, calls) = extractor(vec![
            FixedEngine::new(ExtractionStrategy::Structured, 0.2),
            FixedEngine::new(ExtractionStrategy::Readability, 0.6),
            FixedEngine::new(ExtractionStrategy::Custom, 0.9),
        ]);

        let content = extractor.extract(URL, &options(0.5)).await.unwrap();
        assert_eq!(content.strategy_used, ExtractionStrategy::Readability);
        assert_eq!(content.quality_score, 0.6);
        assert_eq!(content.metadata["extraction_attempts"], 2);
        assert_eq!(calls[2].load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_keeps_best_below_threshold() {
        let (extractor, calls) = extractor(vec![
            FixedEngine::new(ExtractionStrategy::Structured, 0.2),
            FixedEngine::new(ExtractionStrategy::Readability, 0.35),
            FixedEngine::new(ExtractionStrategy::Custom, 0.45),
        ]);

        let content = extractor.extract(URL, &options(0.4)).await.unwrap();
        assert_eq!(content.strategy_used, ExtractionStrategy::Custom);
        assert_eq!(content.metadata["extraction_attempts"], 3);
        assert!(calls.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }

    #[tokio::test]
    async fn test_equal_score_keeps_earlier_engine() {
        let (extractor, _) = extractor(vec![
            FixedEngine::new(ExtractionStrategy::Structured, 0.4),
            FixedEngine::new(ExtractionStrategy::Readability, 0.4),
        ]);

        let err = extractor.extract(URL, &options(0.5)).await.unwrap_err();
        assert_eq!(
            err,
            ExtractionError::QualityBelowThreshold {
                url: URL.to_string(),
                achieved: 0.4,
                threshold: 0.5,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_engine_triggers_fallback() {
        let (extractor, _) = extractor(vec![
            FixedEngine::failing(ExtractionStrategy::Structured),
            FixedEngine::new(ExtractionStrategy::Custom, 0.7),
        ]);

        let content = extractor.extract(URL, &options(0.3)).await.unwrap();
        assert_eq!(content.strategy_used, ExtractionStrategy::Custom);
    }

    #[tokio::test]
    async fn test_all_engines_failing() {
        let (extractor, _) = extractor(vec![
            FixedEngine::failing(ExtractionStrategy::Structured),
            FixedEngine::failing(ExtractionStrategy::Custom),
        ]);

        let err = extractor.extract(URL, &options(0.3)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractionFailure);
        assert!(matches!(
            err,
            ExtractionError::AllEnginesFailed { attempts: 2, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_engine_is_treated_as_failure() {
        let (extractor, _) = extractor(vec![
            FixedEngine::new(ExtractionStrategy::Structured, 0.9).delayed(Duration::from_secs(10)),
            FixedEngine::new(ExtractionStrategy::Custom, 0.6),
        ]);
        let options = ExtractionOptions {
            engine_timeout_secs: Some(2),
            ..options(0.3)
        };

        let content = extractor.extract(URL, &options).await.unwrap();
        assert_eq!(content.strategy_used, ExtractionStrategy::Custom);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overall_timeout_is_terminal() {
        let (extractor, calls) = extractor(vec![
            FixedEngine::new(ExtractionStrategy::Structured, 0.9).delayed(Duration::from_secs(60)),
            FixedEngine::new(ExtractionStrategy::Custom, 0.9),
        ]);
        let options = ExtractionOptions {
            timeout_secs: 5,
            ..options(0.3)
        };

        let err = extractor.extract(URL, &options).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimeoutExceeded);
        assert_eq!(calls[1].load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_largest_timeouts_are_usable() {
        let (extractor, _) = extractor(vec![FixedEngine::new(ExtractionStrategy::Custom, 0.8)]);
        let options = ExtractionOptions {
            timeout_secs: u64::MAX,
            engine_timeout_secs: Some(u64::MAX),
            ..options(0.3)
        };
        assert!(options.validate().is_ok());

        let content = extractor.extract(URL, &options).await.unwrap();
        assert_eq!(content.strategy_used, ExtractionStrategy::Custom);
    }

    #[tokio::test]
    async fn test_largest_timeout_with_page_engines() {
        let url = "https://news.example-cnn.com/story";
        let fetcher = StaticFetcher::new();
        fetcher.add_page(url, NEWS_PAGE);
        let extractor = UrlContentExtractor::with_fetcher(Arc::new(fetcher));
        let options = ExtractionOptions {
            timeout_secs: u64::MAX,
            ..options(0.3)
        };

        let content = extractor.extract(url, &options).await.unwrap();
        assert!(content.text.contains("Harbour traffic reached a record level"));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_fetching() {
        let fetcher = StaticFetcher::new();
        let extractor = UrlContentExtractor::with_fetcher(Arc::new(fetcher.clone()));
        let err = extractor
            .extract("example.org/no-scheme", &options(0.3))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_explicit_strategy_selects_automatically() {
        let (extractor, _) = extractor(vec![FixedEngine::new(ExtractionStrategy::Custom, 0.8)]);
        let options = ExtractionOptions {
            strategy: ExtractionStrategy::Boilerplate,
            ..options(0.3)
        };
        let content = extractor.extract(URL, &options).await.unwrap();
        assert_eq!(content.strategy_used, ExtractionStrategy::Custom);
    }

    #[tokio::test]
    async fn test_text_truncated_to_max_length() {
        let (extractor, _) = extractor(vec![FixedEngine::new(ExtractionStrategy::Custom, 0.8)]);
        let options = ExtractionOptions {
            max_content_length: 10,
            ..options(0.3)
        };
        let content = extractor.extract(URL, &options).await.unwrap();
        assert_eq!(content.text, "Some extra");
    }

    #[tokio::test]
    async fn test_language_skipped_without_metadata() {
        let (extractor, _) = extractor(vec![FixedEngine::new(ExtractionStrategy::Custom, 0.8)]);
        let options = ExtractionOptions {
            include_metadata: false,
            ..options(0.3)
        };
        let content = extractor.extract(URL, &options).await.unwrap();
        assert!(content.language.is_none());
        assert!(content.metadata.contains_key("url_analysis"));
    }

    proptest! {
        #[test]
        fn prop_quality_in_unit_range(
            text in ".{0,3000}",
            title in proptest::option::of(".{0,40}"),
            has_author in any::<bool>(),
        ) {
            let output = EngineOutput {
                text,
                title,
                author: has_author.then(|| "Someone".to_string()),
                ..EngineOutput::default()
            };
            let score = quality::assess(&output);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
