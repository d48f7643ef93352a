//! Focused document processor
//!
//! Routes each payload to the collaborator that suits its kind, combines the
//! outputs and always answers with a [`ProcessingResult`].

use crate::assemble::{self, Extraction, CONVERTER, OCR, TEXT_PROCESSOR, URL_EXTRACTOR};
use crate::clients::{HttpDocumentConverter, HttpOcrService};
use crate::config::{ConfigError, DocsiftConfig};
use crate::error::ProcessorError;
use crate::options::ProcessingOptions;
use docsift_cache::{MemoryCacheStore, ProcessingCache};
use docsift_domain::{
    Deadline, DocumentConverter, ExtractedContent, ExtractionOptions, ExtractionStrategy,
    InputKind, InputPayload, OcrOptions, OcrService, ProcessedText, ProcessingResult,
    ProcessingStrategy,
};
use docsift_text::{TextError, TextProcessingOptions, TextProcessor};
use docsift_web::{EngineRegistry, ExtractionError, HttpFetcher, UrlContentExtractor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Longest time a URL extraction may take inside a request (seconds)
pub const URL_TIMEOUT_CAP_SECS: u64 = 60;

/// Counters and capabilities of a processor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessorStatistics {
    /// Requests answered, including failures and cache hits
    pub total_processed: u64,
    /// Requests answered with `success = true`
    pub successful_processed: u64,
    /// `successful_processed / total_processed`, zero before the first request
    pub success_rate: f64,
    /// Whether each processor can currently take work
    pub available_processors: BTreeMap<String, bool>,
    /// Web extraction engines in fallback order
    pub extraction_strategies: Vec<ExtractionStrategy>,
    /// Whether results are cached
    pub cache_enabled: bool,
    /// Accepted input kinds
    pub supported_input_kinds: Vec<InputKind>,
    /// Accepted routing strategies
    pub supported_strategies: Vec<ProcessingStrategy>,
}

/// Unified document processing pipeline
///
/// One long-lived instance holds every sub-component and is shared by
/// reference (or `Arc`) between concurrent requests. The counters are the
/// only state requests share besides the cache.
///
/// # Examples
///
/// ```no_run
/// use docsift_domain::InputPayload;
/// use docsift_processor::{FocusedDocumentProcessor, ProcessingOptions};
///
/// # async fn example() {
/// let processor = FocusedDocumentProcessor::new();
/// let result = processor
///     .process_document(
///         &InputPayload::text("Revenue increased by 12.5% in 2023 according to the annual report."),
///         &ProcessingOptions::default(),
///     )
///     .await;
/// assert!(result.success);
/// # }
/// ```
pub struct FocusedDocumentProcessor {
    converter: Option<Arc<dyn DocumentConverter>>,
    ocr: Option<Arc<dyn OcrService>>,
    extractor: UrlContentExtractor,
    text: TextProcessor,
    cache: Option<ProcessingCache>,
    extraction_defaults: ExtractionOptions,
    total: AtomicU64,
    successful: AtomicU64,
}

impl Default for FocusedDocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusedDocumentProcessor {
    /// Processor with HTTP web extraction, an in-memory cache and no collaborators
    pub fn new() -> Self {
        Self::with_components(TextProcessor::new(), UrlContentExtractor::new())
    }

    /// Processor over the given text processor and URL extractor
    pub fn with_components(text: TextProcessor, extractor: UrlContentExtractor) -> Self {
        Self {
            converter: None,
            ocr: None,
            extractor,
            text,
            cache: Some(ProcessingCache::new(Arc::new(MemoryCacheStore::new()))),
            extraction_defaults: ExtractionOptions::default(),
            total: AtomicU64::new(0),
            successful: AtomicU64::new(0),
        }
    }

    /// Build a processor from configuration
    ///
    /// Collaborators are created only for the sections present in `config`.
    pub fn from_config(config: &DocsiftConfig) -> Result<Self, ProcessorError> {
        config
            .validate()
            .map_err(|e| ProcessorError::Config(ConfigError::Invalid(e)))?;

        let registry = EngineRegistry::with_enabled(
            Arc::new(HttpFetcher::new()),
            &config.extraction.enabled_engines,
        );
        let mut processor = Self::with_components(
            TextProcessor::new(),
            UrlContentExtractor::with_registry(registry),
        )
        .with_extraction_defaults(config.extraction.base_options());

        processor.cache = config.cache.enabled.then(|| {
            ProcessingCache::new(Arc::new(MemoryCacheStore::new()))
                .with_prefix(config.cache.prefix.clone())
                .with_ttl(Duration::from_secs(config.cache.ttl_secs))
        });

        if let Some(converter) = &config.converter {
            let client = HttpDocumentConverter::new(converter).map_err(|source| {
                ProcessorError::Collaborator {
                    processor: "Converter",
                    source,
                }
            })?;
            processor.converter = Some(Arc::new(client));
        }
        if let Some(ocr) = &config.ocr {
            let client = HttpOcrService::new(ocr).map_err(|source| ProcessorError::Collaborator {
                processor: "OCR",
                source,
            })?;
            processor.ocr = Some(Arc::new(client));
        }

        info!(
            "Processor ready (converter: {}, ocr: {}, cache: {})",
            processor.converter.is_some(),
            processor.ocr.is_some(),
            processor.cache.is_some()
        );
        Ok(processor)
    }

    /// Use `converter` for PDF and Word documents
    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Use `ocr` for images and PDFs
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrService>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Replace the result cache
    pub fn with_cache(mut self, cache: ProcessingCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Disable result caching
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Base options for URL extraction (user agent, engine timeout, TLS policy)
    pub fn with_extraction_defaults(mut self, options: ExtractionOptions) -> Self {
        self.extraction_defaults = options;
        self
    }

    /// The URL extractor
    pub fn url_extractor(&self) -> &UrlContentExtractor {
        &self.extractor
    }

    /// The text processor
    pub fn text_processor(&self) -> &TextProcessor {
        &self.text
    }

    /// Base options for URL extraction
    pub fn extraction_defaults(&self) -> &ExtractionOptions {
        &self.extraction_defaults
    }

    /// Extract a web page directly
    pub async fn extract_url(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractedContent, ExtractionError> {
        self.extractor.extract(url, options).await
    }

    /// Analyze text directly
    pub async fn process_text(
        &self,
        text: &str,
        options: &TextProcessingOptions,
    ) -> Result<ProcessedText, TextError> {
        self.text.process_text(text, options).await
    }

    /// Process `payload`
    ///
    /// Never fails: validation errors, collaborator failures and the request
    /// deadline all produce a result with `success = false` and the message
    /// in `errors`.
    pub async fn process_document(
        &self,
        payload: &InputPayload,
        options: &ProcessingOptions,
    ) -> ProcessingResult {
        let started = Instant::now();
        let strategy = resolve_strategy(payload.kind, options.strategy);
        info!(
            "Processing {} input ({} bytes) with {}",
            payload.kind,
            payload.data.len(),
            strategy
        );

        if let Err(e) = validate(payload, options) {
            return self.failure(payload, strategy, e, started);
        }

        let cache_key = self.cache_key(payload, options);
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if !options.bypass_cache {
                if let Some(mut cached) = cache.get(key).await {
                    cached.processing_id = Uuid::now_v7();
                    info!("Cache hit for processing ID: {}", cached.processing_id);
                    self.record(true);
                    return cached;
                }
            }
        }

        let deadline = Deadline::after(options.timeout());
        let dispatched = deadline
            .run(self.dispatch(payload, options, strategy, deadline))
            .await
            .unwrap_or_else(|_| Err(ProcessorError::Timeout(options.timeout_secs)));

        let mut result = match dispatched {
            Ok(result) => result,
            Err(e) => return self.failure(payload, strategy, e, started),
        };

        assemble::fill_counts(&mut result, payload.data.len());
        result.processing_stats.processing_time = started.elapsed().as_secs_f64();

        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            cache.set(key, &result).await;
        }

        self.record(true);
        info!(
            "Processing completed for {} in {:.2}s",
            result.processing_id, result.processing_stats.processing_time
        );
        result
    }

    /// Counters and capabilities
    pub fn statistics(&self) -> ProcessorStatistics {
        let total = self.total.load(Ordering::Relaxed);
        let successful = self.successful.load(Ordering::Relaxed);
        let success_rate = if total > 0 {
            successful as f64 / total as f64
        } else {
            0.0
        };

        let available_processors = BTreeMap::from([
            (CONVERTER.to_string(), self.available_converter().is_some()),
            (OCR.to_string(), self.available_ocr().is_some()),
            (
                URL_EXTRACTOR.to_string(),
                !self.extractor.available_strategies().is_empty(),
            ),
            (TEXT_PROCESSOR.to_string(), true),
        ]);

        ProcessorStatistics {
            total_processed: total,
            successful_processed: successful,
            success_rate,
            available_processors,
            extraction_strategies: self.extractor.available_strategies(),
            cache_enabled: self.cache.is_some(),
            supported_input_kinds: InputKind::ALL.to_vec(),
            supported_strategies: ProcessingStrategy::ALL.to_vec(),
        }
    }

    fn record(&self, success: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn failure(
        &self,
        payload: &InputPayload,
        strategy: ProcessingStrategy,
        err: ProcessorError,
        started: Instant,
    ) -> ProcessingResult {
        error!("Processing {} input failed: {}", payload.kind, err);
        let mut result = ProcessingResult::failure(payload.kind, strategy, err.to_string());
        result
            .metadata
            .insert("error_kind".into(), err.kind().as_str().into());
        result.processing_stats.input_size = payload.data.len();
        result.processing_stats.processing_time = started.elapsed().as_secs_f64();
        self.record(false);
        result
    }

    fn cache_key(&self, payload: &InputPayload, options: &ProcessingOptions) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match cache.key(payload, &options.cache_view()) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("Could not build cache key: {}", e);
                None
            }
        }
    }

    fn available_converter(&self) -> Option<&Arc<dyn DocumentConverter>> {
        self.converter.as_ref().filter(|c| c.is_available())
    }

    fn available_ocr(&self) -> Option<&Arc<dyn OcrService>> {
        self.ocr.as_ref().filter(|o| o.is_available())
    }

    async fn dispatch(
        &self,
        payload: &InputPayload,
        options: &ProcessingOptions,
        strategy: ProcessingStrategy,
        deadline: Deadline,
    ) -> Result<ProcessingResult, ProcessorError> {
        match payload.kind {
            InputKind::Pdf => self.process_pdf(payload, options, strategy).await,
            InputKind::Doc | InputKind::Docx => self.process_word(payload, options).await,
            InputKind::Image => self.process_image(payload, options).await,
            InputKind::Url => self.process_url(payload, options, deadline).await,
            InputKind::Txt | InputKind::Text => self.process_plain_text(payload, options).await,
        }
    }

    async fn process_pdf(
        &self,
        payload: &InputPayload,
        options: &ProcessingOptions,
        strategy: ProcessingStrategy,
    ) -> Result<ProcessingResult, ProcessorError> {
        let bytes = payload.data.as_bytes();
        let filename = payload.filename.as_deref().unwrap_or("document.pdf");
        let mut warnings = Vec::new();
        let mut processors = Vec::new();

        let mut converted = None;
        let mut converter_time = None;
        if strategy != ProcessingStrategy::OcrOnly {
            match self.available_converter() {
                Some(converter) => {
                    let started = Instant::now();
                    match converter.convert(bytes, filename).await {
                        Ok(doc) => {
                            processors.push(CONVERTER.to_string());
                            converted = Some(Extraction::from_converted(doc));
                        }
                        Err(e) => {
                            warn!("Converter processing failed: {}", e);
                            warnings.push(format!("Converter processing failed: {}", e));
                        }
                    }
                    let elapsed = started.elapsed().as_secs_f64();
                    debug!("Converter finished in {:.2}s", elapsed);
                    converter_time = Some(elapsed);
                }
                None => warnings.push("Document converter not available".to_string()),
            }
        }

        let wants_ocr = matches!(
            strategy,
            ProcessingStrategy::OcrOnly | ProcessingStrategy::Hybrid
        ) || options.force_ocr
            || converted.is_none();

        let mut recognized = None;
        let mut ocr_time = None;
        if wants_ocr {
            match self.available_ocr() {
                Some(ocr) => {
                    let started = Instant::now();
                    match ocr
                        .process_pdf(bytes, options.ocr_pages.as_deref(), &ocr_options(options))
                        .await
                    {
                        Ok(output) => {
                            processors.push(OCR.to_string());
                            recognized = Some(Extraction::from_ocr(output));
                        }
                        Err(e) => {
                            warn!("OCR processing failed: {}", e);
                            warnings.push(format!("OCR processing failed: {}", e));
                        }
                    }
                    let elapsed = started.elapsed().as_secs_f64();
                    debug!("OCR finished in {:.2}s", elapsed);
                    ocr_time = Some(elapsed);
                }
                None => warnings.push("OCR service not available".to_string()),
            }
        }

        let (primary, secondary) = assemble::rank(converted, recognized)
            .ok_or_else(|| ProcessorError::NoResult(warnings.join("; ")))?;
        info!("PDF primary output from {}", primary.source);

        let mut result =
            assemble::from_extractions(payload.kind, strategy, primary, secondary, options);
        result.processing_stats.processors_used = processors;
        result.processing_stats.converter_time = converter_time;
        result.processing_stats.ocr_time = ocr_time;
        result.warnings.extend(warnings);
        self.analyze(&mut result, options).await;
        Ok(result)
    }

    async fn process_word(
        &self,
        payload: &InputPayload,
        options: &ProcessingOptions,
    ) -> Result<ProcessingResult, ProcessorError> {
        let converter = self
            .available_converter()
            .ok_or(ProcessorError::Unavailable("Document converter"))?;
        let filename = payload
            .filename
            .clone()
            .unwrap_or_else(|| format!("document.{}", payload.kind));

        let started = Instant::now();
        let doc = converter
            .convert(payload.data.as_bytes(), &filename)
            .await
            .map_err(|source| ProcessorError::Collaborator {
                processor: "Converter",
                source,
            })?;

        let mut result = assemble::from_extractions(
            payload.kind,
            ProcessingStrategy::ConverterOnly,
            Extraction::from_converted(doc),
            None,
            options,
        );
        result.processing_stats.processors_used = vec![CONVERTER.to_string()];
        result.processing_stats.converter_time = Some(started.elapsed().as_secs_f64());
        self.analyze(&mut result, options).await;
        Ok(result)
    }

    async fn process_image(
        &self,
        payload: &InputPayload,
        options: &ProcessingOptions,
    ) -> Result<ProcessingResult, ProcessorError> {
        let ocr = self
            .available_ocr()
            .ok_or(ProcessorError::Unavailable("OCR service"))?;
        let format = assemble::image_format(payload.filename.as_deref());

        let started = Instant::now();
        let output = ocr
            .process_image(payload.data.as_bytes(), format, &ocr_options(options))
            .await
            .map_err(|source| ProcessorError::Collaborator {
                processor: "OCR",
                source,
            })?;

        let mut result = assemble::from_extractions(
            payload.kind,
            ProcessingStrategy::OcrOnly,
            Extraction::from_ocr(output),
            None,
            options,
        );
        result.processing_stats.processors_used = vec![OCR.to_string()];
        result.processing_stats.ocr_time = Some(started.elapsed().as_secs_f64());
        self.analyze(&mut result, options).await;
        Ok(result)
    }

    async fn process_url(
        &self,
        payload: &InputPayload,
        options: &ProcessingOptions,
        deadline: Deadline,
    ) -> Result<ProcessingResult, ProcessorError> {
        let url = payload
            .as_text()
            .ok_or_else(|| ProcessorError::InvalidInput("URL input must be text".to_string()))?;
        let extraction_options = ExtractionOptions {
            strategy: ExtractionStrategy::Auto,
            timeout_secs: options.timeout_secs.min(URL_TIMEOUT_CAP_SECS),
            include_metadata: options.include_metadata,
            include_images: options.include_images,
            quality_threshold: options.quality_threshold.threshold(),
            ..self.extraction_defaults.clone()
        };

        let started = Instant::now();
        let content = self
            .extractor
            .extract_until(url, &extraction_options, deadline)
            .await?;

        let mut result = assemble::from_extracted(payload.kind, content, options);
        result.processing_stats.processors_used = vec![URL_EXTRACTOR.to_string()];
        result.processing_stats.url_extraction_time = Some(started.elapsed().as_secs_f64());
        self.analyze(&mut result, options).await;
        Ok(result)
    }

    async fn process_plain_text(
        &self,
        payload: &InputPayload,
        options: &ProcessingOptions,
    ) -> Result<ProcessingResult, ProcessorError> {
        let text = payload
            .as_text()
            .ok_or_else(|| ProcessorError::InvalidInput("Text input must be text".to_string()))?;
        let text_options = TextProcessingOptions {
            detect_language: true,
            analyze_structure: true,
            detect_claims: options.detect_claims,
            ..text_options(options)
        };

        let started = Instant::now();
        let processed = self.text.process_text(text, &text_options).await?;

        let mut result = assemble::from_processed_text(payload.kind, processed, options);
        result.processing_stats.processors_used = vec![TEXT_PROCESSOR.to_string()];
        result.processing_stats.text_processing_time = Some(started.elapsed().as_secs_f64());
        Ok(result)
    }

    /// Segment and detect claims in a collaborator's text
    ///
    /// Failures are recorded as warnings; the result stays successful.
    async fn analyze(&self, result: &mut ProcessingResult, options: &ProcessingOptions) {
        if !options.detect_claims || result.text.trim().is_empty() {
            return;
        }

        let started = Instant::now();
        match self.text.process_text(&result.text, &text_options(options)).await {
            Ok(processed) => assemble::attach_analysis(result, processed),
            Err(e) => {
                warn!("Text analysis failed: {}", e);
                result.warnings.push(format!("Text analysis failed: {}", e));
            }
        }
        result.processing_stats.text_processing_time = Some(started.elapsed().as_secs_f64());
    }
}

/// The strategy applied to a payload kind
///
/// Only PDFs honour an explicit strategy, and only the collaborator ones;
/// every other kind has exactly one route.
pub fn resolve_strategy(kind: InputKind, requested: ProcessingStrategy) -> ProcessingStrategy {
    match (kind, requested) {
        (
            InputKind::Pdf,
            ProcessingStrategy::ConverterOnly
            | ProcessingStrategy::OcrOnly
            | ProcessingStrategy::Hybrid,
        ) => requested,
        _ => ProcessingStrategy::for_kind(kind),
    }
}

fn validate(payload: &InputPayload, options: &ProcessingOptions) -> Result<(), ProcessorError> {
    options.validate().map_err(ProcessorError::InvalidOptions)?;

    let size = payload.data.len();
    if size > options.max_file_size {
        return Err(ProcessorError::InvalidInput(format!(
            "Input size ({} bytes) exceeds maximum allowed size ({} bytes)",
            size, options.max_file_size
        )));
    }
    if payload.data.is_empty() {
        return Err(ProcessorError::InvalidInput("Input is empty".to_string()));
    }
    payload.check_shape().map_err(ProcessorError::InvalidInput)
}

fn text_options(options: &ProcessingOptions) -> TextProcessingOptions {
    TextProcessingOptions {
        segmentation_strategy: options.segmentation_strategy,
        detect_claims: true,
        claim_confidence_threshold: options.claim_confidence_threshold,
        ..TextProcessingOptions::default()
    }
}

fn ocr_options(options: &ProcessingOptions) -> OcrOptions {
    OcrOptions {
        language: options.ocr_language.clone(),
        include_images: options.include_images,
    }
}
