//! Trait definitions for external collaborators
//!
//! The document converter and the OCR service are opaque to this workspace.
//! Implementations live in `docsift-processor` (HTTP clients and mocks).

use crate::Metadata;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by an external collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// The collaborator is not configured
    #[error("Collaborator not configured: {0}")]
    NotConfigured(String),

    /// The payload format is not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The collaborator answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The collaborator rejected the request for rate reasons
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Processing failed inside the collaborator
    #[error("Processing failed: {0}")]
    Failed(String),
}

/// Output of the document converter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertedDocument {
    /// Plain text
    pub text: String,
    /// Markdown rendering
    pub markdown: Option<String>,
    /// Extracted tables
    pub tables: Vec<serde_json::Value>,
    /// Extracted images
    pub images: Vec<serde_json::Value>,
    /// Document metadata
    pub metadata: Metadata,
    /// Converter's own quality estimate
    pub quality_score: Option<f64>,
    /// Converter-specific structured content
    pub structured_content: Option<serde_json::Value>,
}

/// Options passed to the OCR service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    /// Language hint
    pub language: Option<String>,
    /// Return embedded images
    pub include_images: bool,
}

/// Output of the OCR service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOutput {
    /// Recognized text
    pub text: String,
    /// Markdown rendering
    pub markdown: Option<String>,
    /// Recognized tables
    pub tables: Vec<serde_json::Value>,
    /// Embedded images
    pub images: Vec<serde_json::Value>,
    /// Recognition confidence
    pub confidence_score: Option<f64>,
    /// Service metadata
    pub metadata: Metadata,
}

/// Structured-document conversion engine (PDF, DOC, DOCX)
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert document bytes into text and structure
    async fn convert(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ConvertedDocument, CollaboratorError>;

    /// Whether the converter is ready to accept work
    fn is_available(&self) -> bool {
        true
    }

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Image and PDF OCR engine
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Recognize text in an image of the given format (e.g. `png`)
    async fn process_image(
        &self,
        bytes: &[u8],
        format: &str,
        options: &OcrOptions,
    ) -> Result<OcrOutput, CollaboratorError>;

    /// Recognize text in a PDF, optionally restricted to some pages
    async fn process_pdf(
        &self,
        bytes: &[u8],
        pages: Option<&[u32]>,
        options: &OcrOptions,
    ) -> Result<OcrOutput, CollaboratorError>;

    /// Whether the service is ready to accept work
    fn is_available(&self) -> bool {
        true
    }

    /// Name used in logs
    fn name(&self) -> &'static str;
}
