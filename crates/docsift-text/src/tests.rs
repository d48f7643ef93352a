//! Integration tests for the text processor

#[cfg(test)]
mod tests {
    use crate::{
        FixedLanguageBackend, TextError, TextProcessingOptions, TextProcessor, TextSegmenter,
    };
    use docsift_domain::{segments_are_ordered, ErrorKind, SegmentationStrategy};
    use proptest::prelude::*;
    use std::sync::Arc;

    const REVENUE: &str = "Revenue increased by 12.5% in 2023 according to the annual report.";

    const ARTICLE: &str = "Global Energy Outlook\n\
        According to the International Energy Agency, solar capacity grew by 24% in 2023, which is the largest annual increase on record. Analysts expect growth to continue as panel prices keep falling across most markets.\n\n\
        Wind power has been slower. Researchers found that offshore projects were delayed by supply chain problems since 2021. Costs rose to 4,200 dollars per kilowatt compared to 3,100 dollars two years earlier.\n\n\
        Cookie policy: we use cookies to improve your experience\n\n\
        Policy makers say the next decade will be decisive for the energy transition and for meeting climate targets.";

    fn deterministic() -> TextProcessor {
        TextProcessor::with_language_backend(Arc::new(FixedLanguageBackend::new("en", 0.99)))
    }

    #[tokio::test]
    async fn test_revenue_sentence_yields_one_claim_and_segment() {
        let processor = deterministic();
        let processed = processor
            .process_text(REVENUE, &TextProcessingOptions::default())
            .await
            .unwrap();

        assert_eq!(processed.claims.len(), 1);
        assert!(processed.claims[0].confidence >= 0.9);
        assert_eq!(processed.segments.len(), 1);
        assert_eq!(processed.segments[0].kind, "paragraph");
        assert_eq!(processed.cleaned_text, REVENUE);
    }

    #[tokio::test]
    async fn test_short_text_rejected() {
        let processor = deterministic();
        let err = processor
            .process_text("     hello     ", &TextProcessingOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TextTooShort);
        assert!(matches!(err, TextError::TextTooShort { length: 5, .. }));
    }

    #[tokio::test]
    async fn test_short_after_cleaning_rejected() {
        let processor = deterministic();
        let err = processor
            .process_text("Hi!!!!\n\nAdvertisement: buy our stuff now", &TextProcessingOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TextError::TextTooShort {
                length: 3,
                stage: "after cleaning"
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_options_rejected() {
        let options = TextProcessingOptions {
            min_segment_length: 1,
            ..Default::default()
        };
        let err = deterministic().process_text(ARTICLE, &options).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_processing_is_idempotent() {
        let processor = deterministic();
        for strategy in SegmentationStrategy::ALL {
            let options = TextProcessingOptions {
                segmentation_strategy: strategy,
                ..Default::default()
            };
            let first = processor.process_text(ARTICLE, &options).await.unwrap();
            let second = processor.process_text(ARTICLE, &options).await.unwrap();
            assert_eq!(first.claims, second.claims);
            assert_eq!(first.segments, second.segments);
            assert_eq!(first.processing_metadata, second.processing_metadata);
        }
    }

    #[tokio::test]
    async fn test_article_analysis() {
        let processed = deterministic()
            .process_text(ARTICLE, &TextProcessingOptions::default())
            .await
            .unwrap();

        assert!(!processed.cleaned_text.to_lowercase().contains("cookie policy"));
        assert_eq!(processed.language.as_ref().unwrap().language, "en");
        let structure = processed.structure.as_ref().unwrap();
        assert_eq!(structure.heading_count, 1);
        assert!(structure.has_paragraphs);
        assert!(processed.claims.len() >= 2);
        assert!(segments_are_ordered(&processed.segments));

        for claim in &processed.claims {
            assert!((0.0..=1.0).contains(&claim.confidence));
            assert_eq!(
                &processed.cleaned_text[claim.start..claim.end],
                claim.text.as_str()
            );
        }

        let meta = &processed.processing_metadata;
        assert!(meta.contains_key("reduction_ratio"));
        assert!(meta.contains_key("flesch_reading_ease"));
        assert_eq!(meta["claims_count"], processed.claims.len());
        assert_eq!(meta["language_detected"], "en");
    }

    #[tokio::test]
    async fn test_disabled_analyzers() {
        let options = TextProcessingOptions {
            detect_language: false,
            detect_claims: false,
            analyze_structure: false,
            include_statistics: false,
            ..Default::default()
        };
        let processed = deterministic().process_text(ARTICLE, &options).await.unwrap();
        assert!(processed.language.is_none());
        assert!(processed.structure.is_none());
        assert!(processed.claims.is_empty());
        assert!(!processed.processing_metadata.contains_key("word_count"));
    }

    #[tokio::test]
    async fn test_key_information() {
        let info = deterministic().extract_key_information(ARTICLE).await;
        assert!(info.error.is_none());
        assert!(info.total_claims >= info.high_confidence_claims);
        assert!(info.high_confidence_claims >= 1);
        assert!(info.claims.len() <= 10);
        assert!(info.claims.iter().all(|c| c.confidence >= 0.7));
        assert!(info.keywords.len() <= 20);
        assert!(info.entities.len() <= 15);
        assert_eq!(info.language, "en");
    }

    #[tokio::test]
    async fn test_key_information_failure_is_reported() {
        let info = deterministic().extract_key_information("tiny").await;
        assert_eq!(info.total_claims, 0);
        assert_eq!(info.language, "unknown");
        assert!(info.error.unwrap().contains("too short"));
    }

    #[test]
    fn test_capabilities() {
        let caps = TextProcessor::without_language_backend().capabilities();
        assert!(!caps.language_detection_available);
        assert_eq!(caps.segmentation_strategies.len(), 5);
        assert!(caps.supported_languages.contains(&"en".to_string()));
        assert!(TextProcessor::new().capabilities().language_detection_available);
    }

    fn strategy() -> impl Strategy<Value = SegmentationStrategy> {
        prop::sample::select(SegmentationStrategy::ALL.to_vec())
    }

    fn document() -> impl Strategy<Value = String> {
        let sentence = prop::sample::select(vec![
            "Revenue grew by 8% in 2022 according to the filing.",
            "The board met in the afternoon.",
            "Researchers found that 1,200 samples were contaminated.",
            "Nothing much happened after that.",
            "Prices rose to 45 dollars compared to 30 a year before!",
            "Is this the end of the story?",
            "Über 300 Menschen kamen zur Versammlung.",
        ]);
        let paragraph = prop::collection::vec(sentence, 1..6).prop_map(|s| s.join(" "));
        prop::collection::vec(paragraph, 1..6).prop_map(|p| p.join("\n\n"))
    }

    proptest! {
        #[test]
        fn prop_segments_ordered_for_every_strategy(
            text in document(),
            strategy in strategy(),
            min_len in 10usize..80,
            max_len in 100usize..400,
        ) {
            let segments = TextSegmenter::new().segment(&text, strategy, min_len, max_len);
            prop_assert!(segments_are_ordered(&segments));
            for s in &segments {
                prop_assert_eq!(&text[s.start..s.end], s.text.as_str());
                prop_assert!((0.0..=1.0).contains(&s.confidence));
            }
        }

        #[test]
        fn prop_claim_confidence_in_range(text in document()) {
            let claims = crate::ClaimDetector::new().detect(&text, 0.0).unwrap();
            for claim in claims {
                prop_assert!((0.0..=1.0).contains(&claim.confidence));
            }
        }
    }
}
