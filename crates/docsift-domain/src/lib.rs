//! Docsift Domain Layer
//!
//! Shared data model for the docsift ingestion pipeline. Every other crate in
//! the workspace speaks in these types.
//!
//! ## Key Concepts
//!
//! - **InputPayload**: a document to process, tagged with its kind
//! - **ExtractedContent**: the winning result of a web extraction engine
//! - **ProcessedText**: cleaned text plus segments, claims and structure metrics
//! - **ProcessingResult**: the unified output of the document processor
//! - **Deadline**: a single per-request deadline threaded through all I/O
//!
//! ## Architecture
//!
//! ```text
//! InputPayload → Processor → { Converter | OCR | UrlExtractor | TextProcessor } → ProcessingResult
//! ```
//!
//! Collaborators that live outside this workspace (the document converter and
//! the OCR service) are described by the traits in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod deadline;
pub mod error;
pub mod input;
pub mod result;
pub mod text;
pub mod traits;

// Re-exports for convenience
pub use content::{ContentType, ExtractedContent, ExtractionOptions, ExtractionStrategy};
pub use deadline::{instant_after, Deadline, DeadlineExceeded};
pub use error::ErrorKind;
pub use input::{InputKind, InputPayload, PayloadData};
pub use result::{ProcessingResult, ProcessingStats, ProcessingStrategy};
pub use text::{
    segments_are_ordered, ContentStructure, LanguageInfo, PotentialClaim, ProcessedText,
    SegmentationStrategy, TextSegment,
};
pub use traits::{
    CollaboratorError, ConvertedDocument, DocumentConverter, OcrOptions, OcrOutput, OcrService,
};

/// Free-form metadata attached to most pipeline values.
///
/// Backed by a sorted map so serialized forms are stable.
pub type Metadata = serde_json::Map<String, serde_json::Value>;
