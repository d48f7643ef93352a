//! Integration tests for the focused document processor

use docsift_cache::{MemoryCacheStore, ProcessingCache};
use docsift_domain::{
    ConvertedDocument, InputKind, InputPayload, OcrOutput, ProcessingStrategy,
};
use docsift_processor::{FocusedDocumentProcessor, MockConverter, MockOcr, ProcessingOptions};
use docsift_text::TextProcessor;
use docsift_web::{StaticFetcher, UrlContentExtractor};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const REPORT_TEXT: &str =
    "The annual report shows that revenue increased by 12.5% in 2023. Operating costs fell by 3% over the same period.";

const NEWS_PAGE: &str = r#"<html><head>
    <title>Harbour traffic reaches record levels | Example CNN</title>
    <meta name="author" content="Maria Silva">
    </head><body>
    <nav><a href="/">Home</a></nav>
    <article>
      <p>Harbour traffic reached a record level in May, according to figures released by the port authority on Monday. The number of container ships that arrived was the highest since the port opened.</p>
      <p>Officials said that new berths and longer opening hours had made the difference, and they expect the trend to continue for the rest of the year as trade with Asia grows.</p>
    </article>
    </body></html>"#;

/// Processor over a static web fetcher
fn processor_with(fetcher: StaticFetcher) -> FocusedDocumentProcessor {
    FocusedDocumentProcessor::with_components(
        TextProcessor::new(),
        UrlContentExtractor::with_fetcher(Arc::new(fetcher)),
    )
}

fn processor() -> FocusedDocumentProcessor {
    processor_with(StaticFetcher::new())
}

fn pdf() -> InputPayload {
    InputPayload::binary(InputKind::Pdf, b"%PDF-1.4 test".to_vec(), "report.pdf")
}

fn ocr_output(text: &str, confidence: f64) -> OcrOutput {
    OcrOutput {
        text: text.to_string(),
        tables: vec![json!({"table_id": "ocr_table_1"})],
        confidence_score: Some(confidence),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_plain_text_claim_extraction() {
    let processor = processor();
    let result = processor
        .process_document(
            &InputPayload::text("Revenue increased by 12.5% in 2023 according to the annual report."),
            &ProcessingOptions::default(),
        )
        .await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.strategy_used, ProcessingStrategy::TextAnalysis);
    assert_eq!(result.processing_stats.processors_used, vec!["text_processor"]);
    assert_eq!(result.segments.len(), 1);
    assert_eq!(result.claims.len(), 1);
    assert!(result.claims[0].confidence >= 0.9);
    assert_eq!(result.processing_stats.claim_count, 1);
    assert_eq!(result.processing_stats.quality_score, 0.9);
    assert!(!result.cache_hit);
}

#[tokio::test]
async fn test_hybrid_pdf_survives_converter_failure() {
    let ocr = MockOcr::new(ocr_output(REPORT_TEXT, 0.85));
    let processor = processor()
        .with_converter(Arc::new(MockConverter::failing("corrupt xref table")))
        .with_ocr(Arc::new(ocr.clone()));

    let result = processor.process_document(&pdf(), &ProcessingOptions::default()).await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.strategy_used, ProcessingStrategy::Hybrid);
    assert_eq!(result.processing_stats.processors_used, vec!["ocr"]);
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("Converter processing failed") && w.contains("corrupt xref table")));
    assert_eq!(result.text, REPORT_TEXT);
    assert_eq!(result.processing_stats.ocr_confidence, Some(0.85));
    assert!(!result.claims.is_empty());
    assert_eq!(ocr.formats(), vec!["pdf"]);
}

#[tokio::test]
async fn test_hybrid_pdf_prefers_higher_quality() {
    let converter = MockConverter::new(ConvertedDocument {
        text: "Garbled converter output from a scanned page".to_string(),
        tables: vec![json!({"table_id": "converter_table_1"})],
        quality_score: Some(0.6),
        ..Default::default()
    });
    let processor = processor()
        .with_converter(Arc::new(converter))
        .with_ocr(Arc::new(MockOcr::new(ocr_output(REPORT_TEXT, 0.9))));

    let result = processor.process_document(&pdf(), &ProcessingOptions::default()).await;

    assert!(result.success);
    assert_eq!(result.text, REPORT_TEXT);
    assert_eq!(
        result.processing_stats.processors_used,
        vec!["converter", "ocr"]
    );
    assert_eq!(result.tables.len(), 2);
    assert_eq!(result.processing_stats.table_count, 2);
    assert_eq!(result.processing_stats.quality_score, 0.9);
    assert!(result.processing_stats.converter_time.is_some());
    assert!(result.processing_stats.ocr_time.is_some());
}

#[tokio::test]
async fn test_ocr_only_pdf_skips_converter() {
    let converter = MockConverter::default();
    let processor = processor()
        .with_converter(Arc::new(converter.clone()))
        .with_ocr(Arc::new(MockOcr::new(ocr_output(REPORT_TEXT, 0.8))));
    let options = ProcessingOptions {
        strategy: ProcessingStrategy::OcrOnly,
        ..Default::default()
    };

    let result = processor.process_document(&pdf(), &options).await;

    assert!(result.success);
    assert_eq!(result.strategy_used, ProcessingStrategy::OcrOnly);
    assert_eq!(converter.call_count(), 0);
    assert_eq!(result.processing_stats.processors_used, vec!["ocr"]);
}

#[tokio::test]
async fn test_pdf_without_collaborators_fails() {
    let result = processor()
        .process_document(&pdf(), &ProcessingOptions::default())
        .await;

    assert!(!result.success);
    assert_eq!(result.metadata["error_kind"], "extraction_failure");
    assert!(result.errors[0].contains("Document converter not available"));
    assert!(result.errors[0].contains("OCR service not available"));
}

#[tokio::test]
async fn test_word_document_requires_converter() {
    let payload = InputPayload::binary(InputKind::Docx, b"PK\x03\x04".to_vec(), "memo.docx");
    let result = processor()
        .process_document(&payload, &ProcessingOptions::default())
        .await;

    assert!(!result.success);
    assert_eq!(result.strategy_used, ProcessingStrategy::ConverterOnly);
    assert_eq!(result.errors, vec!["Document converter not available"]);
    assert_eq!(result.metadata["error_kind"], "engine_unavailable");
}

#[tokio::test]
async fn test_word_document_conversion() {
    let converter = MockConverter::new(ConvertedDocument {
        text: REPORT_TEXT.to_string(),
        markdown: Some(format!("# Memo\n\n{}", REPORT_TEXT)),
        ..Default::default()
    });
    let processor = processor().with_converter(Arc::new(converter));
    let payload = InputPayload::binary(InputKind::Docx, b"PK\x03\x04".to_vec(), "memo.docx");

    let result = processor.process_document(&payload, &ProcessingOptions::default()).await;

    assert!(result.success);
    assert_eq!(result.processing_stats.processors_used, vec!["converter"]);
    assert_eq!(result.processing_stats.quality_score, 0.8);
    assert_eq!(result.processing_stats.structure_quality, Some(0.9));
    assert!(result.markdown.unwrap().starts_with("# Memo"));
}

#[tokio::test]
async fn test_image_format_from_filename() {
    let ocr = MockOcr::default();
    let processor = processor().with_ocr(Arc::new(ocr.clone()));
    let payload = InputPayload::binary(InputKind::Image, vec![0x89, b'P', b'N', b'G'], "scan.png");

    let result = processor.process_document(&payload, &ProcessingOptions::default()).await;

    assert!(result.success);
    assert_eq!(result.strategy_used, ProcessingStrategy::OcrOnly);
    assert_eq!(ocr.formats(), vec!["png"]);
    assert_eq!(result.processing_stats.ocr_confidence, Some(0.7));
}

#[tokio::test]
async fn test_url_extraction() {
    let url = "https://news.example-cnn.com/story";
    let fetcher = StaticFetcher::new();
    fetcher.add_page(url, NEWS_PAGE);
    let processor = processor_with(fetcher);

    let result = processor
        .process_document(&InputPayload::url(url), &ProcessingOptions::default())
        .await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.strategy_used, ProcessingStrategy::UrlExtraction);
    assert_eq!(result.processing_stats.processors_used, vec!["url_extractor"]);
    assert!(result.text.contains("Harbour traffic reached a record level"));
    assert_eq!(result.metadata["author"], "Maria Silva");
    assert!(result.metadata.contains_key("extraction_strategy"));
    assert_eq!(result.processing_stats.structure_quality, Some(0.7));
    assert!(result.processing_stats.url_extraction_time.is_some());
}

#[tokio::test]
async fn test_short_text_fails_with_kind() {
    let result = processor()
        .process_document(&InputPayload::text("Too short"), &ProcessingOptions::default())
        .await;

    assert!(!result.success);
    assert_eq!(result.metadata["error_kind"], "text_too_short");
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn test_size_limit() {
    let options = ProcessingOptions {
        max_file_size: 16,
        ..Default::default()
    };
    let result = processor()
        .process_document(&InputPayload::text(REPORT_TEXT), &options)
        .await;

    assert!(!result.success);
    assert_eq!(result.metadata["error_kind"], "validation");
    assert!(result.errors[0].contains("exceeds maximum allowed size"));
    assert_eq!(result.processing_stats.input_size, REPORT_TEXT.len());
}

#[tokio::test]
async fn test_payload_shape_mismatch() {
    let mut payload = InputPayload::text(REPORT_TEXT);
    payload.kind = InputKind::Pdf;

    let result = processor()
        .process_document(&payload, &ProcessingOptions::default())
        .await;

    assert!(!result.success);
    assert_eq!(result.metadata["error_kind"], "validation");
    assert!(result.errors[0].contains("requires a binary payload"));
}

#[tokio::test]
async fn test_invalid_options() {
    let options = ProcessingOptions {
        claim_confidence_threshold: 1.5,
        ..Default::default()
    };
    let result = processor()
        .process_document(&InputPayload::text(REPORT_TEXT), &options)
        .await;

    assert!(!result.success);
    assert_eq!(result.metadata["error_kind"], "validation");
}

#[tokio::test]
async fn test_cache_hit_and_bypass() {
    let converter = MockConverter::new(ConvertedDocument {
        text: REPORT_TEXT.to_string(),
        ..Default::default()
    });
    let processor = processor().with_converter(Arc::new(converter.clone()));
    let payload = InputPayload::binary(InputKind::Docx, b"PK\x03\x04".to_vec(), "memo.docx");
    let options = ProcessingOptions::default();

    let first = processor.process_document(&payload, &options).await;
    let second = processor.process_document(&payload, &options).await;

    assert!(first.success);
    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_ne!(first.processing_id, second.processing_id);
    assert_eq!(first.text, second.text);
    assert_eq!(converter.call_count(), 1);

    let bypass = ProcessingOptions {
        bypass_cache: true,
        ..Default::default()
    };
    let third = processor.process_document(&payload, &bypass).await;
    assert!(!third.cache_hit);
    assert_eq!(converter.call_count(), 2);

    let stats = processor.statistics();
    assert_eq!(stats.total_processed, 3);
    assert_eq!(stats.successful_processed, 3);
}

#[tokio::test]
async fn test_different_options_miss_the_cache() {
    let converter = MockConverter::default();
    let processor = processor().with_converter(Arc::new(converter.clone()));
    let payload = InputPayload::binary(InputKind::Docx, b"PK\x03\x04".to_vec(), "memo.docx");

    processor.process_document(&payload, &ProcessingOptions::default()).await;
    let options = ProcessingOptions {
        include_tables: false,
        ..Default::default()
    };
    let result = processor.process_document(&payload, &options).await;

    assert!(!result.cache_hit);
    assert_eq!(converter.call_count(), 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let store = MemoryCacheStore::new();
    let processor = processor().with_cache(ProcessingCache::new(Arc::new(store.clone())));

    let first = processor
        .process_document(&InputPayload::text("Too short"), &ProcessingOptions::default())
        .await;
    let second = processor
        .process_document(&InputPayload::text("Too short"), &ProcessingOptions::default())
        .await;

    assert!(!first.success);
    assert!(!second.cache_hit);
    assert!(store.is_empty().await);

    let stats = processor.statistics();
    assert_eq!(stats.total_processed, 2);
    assert_eq!(stats.successful_processed, 0);
    assert_eq!(stats.success_rate, 0.0);
}

#[tokio::test]
async fn test_without_cache() {
    let converter = MockConverter::default();
    let processor = processor()
        .with_converter(Arc::new(converter.clone()))
        .without_cache();
    let payload = InputPayload::binary(InputKind::Doc, b"\xd0\xcf\x11\xe0".to_vec(), "old.doc");

    processor.process_document(&payload, &ProcessingOptions::default()).await;
    let result = processor.process_document(&payload, &ProcessingOptions::default()).await;

    assert!(!result.cache_hit);
    assert_eq!(converter.call_count(), 2);
    assert!(!processor.statistics().cache_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_request_deadline() {
    let converter = MockConverter::default();
    converter.set_delay(Duration::from_secs(300));
    let processor = processor().with_converter(Arc::new(converter));
    let payload = InputPayload::binary(InputKind::Docx, b"PK\x03\x04".to_vec(), "memo.docx");
    let options = ProcessingOptions {
        timeout_secs: 5,
        detect_claims: false,
        ..Default::default()
    };

    let result = processor.process_document(&payload, &options).await;

    assert!(!result.success);
    assert_eq!(result.errors, vec!["Processing timed out after 5s"]);
    assert_eq!(result.metadata["error_kind"], "timeout_exceeded");
}

#[tokio::test]
async fn test_statistics_report_collaborators() {
    let processor = processor()
        .with_converter(Arc::new(MockConverter::default()))
        .with_ocr(Arc::new(MockOcr::default()));

    processor
        .process_document(&InputPayload::text(REPORT_TEXT), &ProcessingOptions::default())
        .await;
    processor
        .process_document(&InputPayload::text("Too short"), &ProcessingOptions::default())
        .await;

    let stats = processor.statistics();
    assert_eq!(stats.total_processed, 2);
    assert_eq!(stats.successful_processed, 1);
    assert_eq!(stats.success_rate, 0.5);
    assert!(stats.available_processors["converter"]);
    assert!(stats.available_processors["ocr"]);
    assert!(stats.available_processors["text_processor"]);
    assert_eq!(stats.supported_strategies.len(), 6);
}
