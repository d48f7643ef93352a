//! Mistral-style OCR service over HTTP

use super::{build_client, post_json};
use crate::config::OcrConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use docsift_domain::{CollaboratorError, Metadata, OcrOptions, OcrOutput, OcrService};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Words assumed per page when the service reports no pages
const WORDS_PER_PAGE: usize = 500;

/// Client for an OCR API accepting base64 data URLs
///
/// Requests look like
/// `{"model", "document": {"type": "image_url", "image_url": "data:..."}}`
/// and answers carry one markdown string per page.
pub struct HttpOcrService {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpOcrService {
    /// Create a client from configuration, reading the API key from the environment
    pub fn new(config: &OcrConfig) -> Result<Self, CollaboratorError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!(
                "OCR API key not set; export {} to enable OCR",
                config.api_key_env
            );
        }

        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            max_retries: config.max_retries,
        })
    }

    /// Use an explicit API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    async fn run(
        &self,
        document: Value,
        pages: Option<&[u32]>,
        options: &OcrOptions,
    ) -> Result<OcrOutput, CollaboratorError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CollaboratorError::NotConfigured("OCR API key not configured".to_string())
        })?;

        let mut body = json!({
            "model": self.model,
            "document": document,
            "include_image_base64": options.include_images,
        });
        if let Some(pages) = pages {
            body["pages"] = json!(pages);
        }

        let response =
            post_json(&self.client, &self.endpoint, &body, Some(api_key), self.max_retries).await?;
        let mut output = parse_response(&response, options.include_images)?;
        output.metadata.insert("model".into(), json!(self.model));
        if let Some(language) = &options.language {
            output.metadata.insert("language_hint".into(), json!(language));
        }
        Ok(output)
    }
}

#[async_trait]
impl OcrService for HttpOcrService {
    async fn process_image(
        &self,
        bytes: &[u8],
        format: &str,
        options: &OcrOptions,
    ) -> Result<OcrOutput, CollaboratorError> {
        debug!("OCR on {} image ({} bytes)", format, bytes.len());
        let data_url = format!("data:image/{};base64,{}", format, STANDARD.encode(bytes));
        let document = json!({"type": "image_url", "image_url": data_url});
        self.run(document, None, options).await
    }

    async fn process_pdf(
        &self,
        bytes: &[u8],
        pages: Option<&[u32]>,
        options: &OcrOptions,
    ) -> Result<OcrOutput, CollaboratorError> {
        debug!("OCR on PDF ({} bytes, pages {:?})", bytes.len(), pages);
        let data_url = format!("data:application/pdf;base64,{}", STANDARD.encode(bytes));
        let document = json!({"type": "document_url", "document_url": data_url});
        self.run(document, pages, options).await
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "http-ocr"
    }
}

fn parse_response(response: &Value, include_images: bool) -> Result<OcrOutput, CollaboratorError> {
    let pages = response
        .get("pages")
        .and_then(Value::as_array)
        .ok_or_else(|| CollaboratorError::InvalidResponse("OCR response has no pages".to_string()))?;

    let markdown = pages
        .iter()
        .filter_map(|page| page.get("markdown").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n\n");

    let images: Vec<Value> = if include_images {
        pages
            .iter()
            .filter_map(|page| page.get("images").and_then(Value::as_array))
            .flatten()
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let page_count = if pages.is_empty() {
        estimate_page_count(&markdown)
    } else {
        pages.len()
    };

    let mut metadata = Metadata::new();
    metadata.insert("page_count".into(), json!(page_count));
    if let Some(usage) = response.get("usage_info") {
        metadata.insert("usage".into(), usage.clone());
    }

    Ok(OcrOutput {
        confidence_score: Some(estimate_confidence(&markdown, !images.is_empty())),
        tables: markdown_tables(&markdown),
        text: markdown.clone(),
        markdown: Some(markdown).filter(|m| !m.is_empty()),
        images,
        metadata,
    })
}

/// Heuristic recognition confidence
///
/// Starts at 0.9, loses 0.1 under 100 characters, gains 0.05 over 1000
/// characters and 0.02 when images were returned.
pub fn estimate_confidence(text: &str, has_images: bool) -> f64 {
    let length = text.chars().count();
    let mut confidence: f64 = 0.9;
    if length < 100 {
        confidence -= 0.1;
    } else if length > 1000 {
        confidence += 0.05;
    }
    if has_images {
        confidence += 0.02;
    }
    confidence.clamp(0.0, 1.0)
}

/// Page estimate at five hundred words per page; zero for empty text
pub fn estimate_page_count(text: &str) -> usize {
    let words = text.split_whitespace().count();
    if words == 0 {
        0
    } else {
        (words / WORDS_PER_PAGE).max(1)
    }
}

/// Pipe tables found in markdown
///
/// Each table becomes `{table_id, headers, rows, raw_markdown}`; separator
/// rows are skipped.
pub fn markdown_tables(markdown: &str) -> Vec<Value> {
    let mut tables = Vec::new();
    let mut current: Option<(Vec<String>, Vec<Vec<String>>, Vec<String>)> = None;

    let mut flush = |current: &mut Option<(Vec<String>, Vec<Vec<String>>, Vec<String>)>| {
        if let Some((headers, rows, raw)) = current.take() {
            tables.push(json!({
                "table_id": format!("ocr_table_{}", tables.len() + 1),
                "headers": headers,
                "rows": rows,
                "raw_markdown": raw.join("\n"),
            }));
        }
    };

    for line in markdown.lines().map(str::trim) {
        let is_row = line.len() > 1 && line.starts_with('|') && line.ends_with('|');
        if !is_row {
            flush(&mut current);
            continue;
        }

        let (headers, rows, raw) = current.get_or_insert_with(Default::default);
        raw.push(line.to_string());
        let cells: Vec<String> = line[1..line.len() - 1]
            .split('|')
            .map(|cell| cell.trim().to_string())
            .collect();
        let separator = cells
            .iter()
            .all(|cell| cell.chars().all(|c| matches!(c, '-' | ':' | ' ')));
        if separator {
            continue;
        }
        if headers.is_empty() {
            *headers = cells;
        } else {
            rows.push(cells);
        }
    }
    flush(&mut current);

    tables
}
