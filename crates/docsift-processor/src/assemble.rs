//! Building unified results from collaborator outputs

use crate::options::ProcessingOptions;
use docsift_domain::{
    ConvertedDocument, ExtractedContent, InputKind, Metadata, OcrOutput, ProcessedText,
    ProcessingResult, ProcessingStrategy,
};
use serde_json::{json, Value};

/// Processor names reported in `processors_used`
pub const CONVERTER: &str = "converter";
/// OCR service
pub const OCR: &str = "ocr";
/// Web extraction
pub const URL_EXTRACTOR: &str = "url_extractor";
/// Text processor
pub const TEXT_PROCESSOR: &str = "text_processor";

const CONVERTER_QUALITY: f64 = 0.8;
const CONVERTER_STRUCTURE: f64 = 0.9;
const OCR_CONFIDENCE: f64 = 0.7;
const OCR_STRUCTURE: f64 = 0.6;
const URL_STRUCTURE: f64 = 0.7;
const TEXT_QUALITY: f64 = 0.9;

/// A collaborator output in a common shape
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Extraction {
    pub source: &'static str,
    pub text: String,
    pub markdown: Option<String>,
    pub structured_content: Option<Value>,
    pub tables: Vec<Value>,
    pub images: Vec<Value>,
    pub metadata: Metadata,
    pub quality: f64,
    pub confidence: f64,
    pub structure_quality: f64,
    pub ocr_confidence: Option<f64>,
    pub page_count: Option<u64>,
}

impl Extraction {
    pub fn from_converted(doc: ConvertedDocument) -> Self {
        let quality = doc.quality_score.unwrap_or(CONVERTER_QUALITY).clamp(0.0, 1.0);
        let page_count = doc.metadata.get("page_count").and_then(Value::as_u64);
        Self {
            source: CONVERTER,
            text: doc.text,
            markdown: doc.markdown,
            structured_content: doc.structured_content,
            tables: doc.tables,
            images: doc.images,
            metadata: doc.metadata,
            quality,
            confidence: quality,
            structure_quality: CONVERTER_STRUCTURE,
            ocr_confidence: None,
            page_count,
        }
    }

    pub fn from_ocr(output: OcrOutput) -> Self {
        let confidence = output
            .confidence_score
            .unwrap_or(OCR_CONFIDENCE)
            .clamp(0.0, 1.0);
        let page_count = output.metadata.get("page_count").and_then(Value::as_u64);
        Self {
            source: OCR,
            text: output.text,
            markdown: output.markdown,
            structured_content: None,
            tables: output.tables,
            images: output.images,
            metadata: output.metadata,
            quality: confidence,
            confidence,
            structure_quality: OCR_STRUCTURE,
            ocr_confidence: Some(confidence),
            page_count,
        }
    }
}

/// Order the hybrid outputs into primary and secondary
///
/// The higher quality wins; the converter wins ties.
pub(crate) fn rank(
    converted: Option<Extraction>,
    recognized: Option<Extraction>,
) -> Option<(Extraction, Option<Extraction>)> {
    match (converted, recognized) {
        (Some(c), Some(o)) if c.quality >= o.quality => Some((c, Some(o))),
        (Some(c), Some(o)) => Some((o, Some(c))),
        (Some(c), None) => Some((c, None)),
        (None, Some(o)) => Some((o, None)),
        (None, None) => None,
    }
}

/// Successful result from a primary output and an optional secondary one
///
/// Text, markdown and scores come from the primary. Tables and images of
/// both are kept when requested; metadata keys of the primary win.
pub(crate) fn from_extractions(
    kind: InputKind,
    strategy: ProcessingStrategy,
    primary: Extraction,
    secondary: Option<Extraction>,
    options: &ProcessingOptions,
) -> ProcessingResult {
    let mut result = ProcessingResult::new(kind, strategy);
    result.success = true;

    let mut tables = Vec::new();
    let mut images = Vec::new();
    let mut metadata = Metadata::new();
    for part in std::iter::once(&primary).chain(secondary.as_ref()) {
        if options.include_tables {
            tables.extend(part.tables.iter().cloned());
        }
        if options.include_images {
            images.extend(part.images.iter().cloned());
        }
        if options.include_metadata {
            for (key, value) in &part.metadata {
                metadata.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    let stats = &mut result.processing_stats;
    stats.quality_score = primary.quality;
    stats.confidence_score = primary.confidence;
    stats.text_quality = Some(primary.quality);
    stats.structure_quality = Some(primary.structure_quality);
    stats.ocr_confidence = primary
        .ocr_confidence
        .or_else(|| secondary.as_ref().and_then(|s| s.ocr_confidence));
    stats.page_count = primary
        .page_count
        .or_else(|| secondary.as_ref().and_then(|s| s.page_count));

    result.text = primary.text;
    result.markdown = primary.markdown.filter(|m| !m.is_empty());
    result.structured_content = primary.structured_content;
    result.tables = tables;
    result.images = images;
    result.metadata = metadata;
    result
}

/// Successful result from web extraction
pub(crate) fn from_extracted(
    kind: InputKind,
    content: ExtractedContent,
    options: &ProcessingOptions,
) -> ProcessingResult {
    let mut result = ProcessingResult::new(kind, ProcessingStrategy::UrlExtraction);
    result.success = true;

    if options.include_metadata {
        let mut metadata = content.metadata;
        metadata.insert("title".into(), json!(content.title));
        metadata.insert("author".into(), json!(content.author));
        metadata.insert("publish_date".into(), json!(content.publish_date));
        metadata.insert("extraction_strategy".into(), json!(content.strategy_used));
        metadata.insert("content_type".into(), json!(content.content_type));
        result.metadata = metadata;
    }
    if options.include_images {
        result.images = content
            .images
            .into_iter()
            .map(|url| json!({ "url": url }))
            .collect();
    }

    let stats = &mut result.processing_stats;
    stats.quality_score = content.quality_score;
    stats.confidence_score = content.quality_score;
    stats.text_quality = Some(content.quality_score);
    stats.structure_quality = Some(URL_STRUCTURE);

    result.text = content.text;
    result.links = content.links;
    result.language = content.language;
    result
}

/// Successful result from the text processor
pub(crate) fn from_processed_text(
    kind: InputKind,
    processed: ProcessedText,
    options: &ProcessingOptions,
) -> ProcessingResult {
    let mut result = ProcessingResult::new(kind, ProcessingStrategy::TextAnalysis);
    result.success = true;

    let stats = &mut result.processing_stats;
    stats.quality_score = TEXT_QUALITY;
    stats.confidence_score = TEXT_QUALITY;
    stats.text_quality = Some(TEXT_QUALITY);
    stats.structure_quality = processed.structure.as_ref().map(|s| s.complexity_score);

    if options.include_metadata {
        result.metadata = processed.processing_metadata;
    }
    result.text = processed.cleaned_text;
    result.segments = processed.segments;
    result.claims = processed.claims;
    result.language = processed.language.map(|l| l.language);
    result
}

/// Attach segments and claims from a text pass over a collaborator's text
pub(crate) fn attach_analysis(result: &mut ProcessingResult, processed: ProcessedText) {
    result.segments = processed.segments;
    result.claims = processed.claims;
    if result.language.is_none() {
        result.language = processed.language.map(|l| l.language);
    }
}

/// Fill the size and count figures derived from the final result
pub(crate) fn fill_counts(result: &mut ProcessingResult, input_size: usize) {
    let characters = result.text.chars().count();
    let stats = &mut result.processing_stats;
    stats.input_size = input_size;
    stats.output_size = characters;
    stats.character_count = characters;
    stats.word_count = result.text.split_whitespace().count();
    stats.table_count = result.tables.len();
    stats.image_count = result.images.len();
    stats.claim_count = result.claims.len();
}

/// OCR image format from a file name, `jpeg` when unknown
pub fn image_format(filename: Option<&str>) -> &'static str {
    const FORMATS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];
    filename
        .and_then(|name| name.rsplit_once('.'))
        .and_then(|(_, ext)| {
            FORMATS
                .into_iter()
                .find(|format| format.eq_ignore_ascii_case(ext))
        })
        .unwrap_or("jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted(quality: Option<f64>) -> Extraction {
        Extraction::from_converted(ConvertedDocument {
            text: "Converter text".to_string(),
            markdown: Some("# Converter text".to_string()),
            tables: vec![json!({"id": "c1"})],
            images: vec![json!({"id": "ci"})],
            metadata: Metadata::from_iter([
                ("title".to_string(), json!("From converter")),
                ("page_count".to_string(), json!(4)),
            ]),
            quality_score: quality,
            structured_content: Some(json!({"sections": 2})),
        })
    }

    fn recognized(confidence: Option<f64>) -> Extraction {
        Extraction::from_ocr(OcrOutput {
            text: "OCR text".to_string(),
            tables: vec![json!({"id": "o1"})],
            confidence_score: confidence,
            metadata: Metadata::from_iter([("title".to_string(), json!("From OCR"))]),
            ..Default::default()
        })
    }

    #[test]
    fn test_defaults_for_missing_scores() {
        assert_eq!(converted(None).quality, 0.8);
        let ocr = recognized(None);
        assert_eq!(ocr.confidence, 0.7);
        assert_eq!(ocr.ocr_confidence, Some(0.7));
    }

    #[test]
    fn test_rank_prefers_higher_quality() {
        let (primary, secondary) = rank(Some(converted(Some(0.6))), Some(recognized(Some(0.9)))).unwrap();
        assert_eq!(primary.source, OCR);
        assert_eq!(secondary.unwrap().source, CONVERTER);

        let (primary, _) = rank(Some(converted(Some(0.7))), Some(recognized(Some(0.7)))).unwrap();
        assert_eq!(primary.source, CONVERTER);

        assert!(rank(None, None).is_none());
    }

    #[test]
    fn test_merge_unions_tables_and_images() {
        let options = ProcessingOptions {
            include_images: true,
            ..Default::default()
        };
        let (primary, secondary) = rank(Some(converted(None)), Some(recognized(Some(0.95)))).unwrap();
        let result = from_extractions(
            InputKind::Pdf,
            ProcessingStrategy::Hybrid,
            primary,
            secondary,
            &options,
        );

        assert!(result.success);
        assert_eq!(result.text, "OCR text");
        assert_eq!(result.tables, vec![json!({"id": "o1"}), json!({"id": "c1"})]);
        assert_eq!(result.images, vec![json!({"id": "ci"})]);
        assert_eq!(result.metadata["title"], "From OCR");
        assert_eq!(result.processing_stats.page_count, Some(4));
        assert_eq!(result.processing_stats.quality_score, 0.95);
        assert_eq!(result.processing_stats.ocr_confidence, Some(0.95));
    }

    #[test]
    fn test_tables_and_metadata_can_be_excluded() {
        let options = ProcessingOptions {
            include_tables: false,
            include_metadata: false,
            ..Default::default()
        };
        let result = from_extractions(
            InputKind::Docx,
            ProcessingStrategy::ConverterOnly,
            converted(None),
            None,
            &options,
        );
        assert!(result.tables.is_empty());
        assert!(result.images.is_empty());
        assert!(result.metadata.is_empty());
        assert_eq!(result.markdown.as_deref(), Some("# Converter text"));
    }

    #[test]
    fn test_fill_counts() {
        let mut result = ProcessingResult::new(InputKind::Text, ProcessingStrategy::TextAnalysis);
        result.text = "Two words".to_string();
        result.tables.push(json!({}));
        fill_counts(&mut result, 42);
        let stats = &result.processing_stats;
        assert_eq!(stats.input_size, 42);
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.character_count, 9);
        assert_eq!(stats.table_count, 1);
    }

    #[test]
    fn test_image_format() {
        assert_eq!(image_format(Some("scan.PNG")), "png");
        assert_eq!(image_format(Some("photo.webp")), "webp");
        assert_eq!(image_format(Some("scan.heic")), "jpeg");
        assert_eq!(image_format(Some("noext")), "jpeg");
        assert_eq!(image_format(None), "jpeg");
    }
}
