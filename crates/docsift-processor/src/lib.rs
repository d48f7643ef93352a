//! Docsift Document Processor
//!
//! A single entry point for documents of any supported kind. Each payload is
//! routed to the component that handles it and every answer, successful or
//! not, comes back as a [`ProcessingResult`](docsift_domain::ProcessingResult).
//!
//! # Routing
//!
//! | Input kind      | Strategy         | Components                               |
//! |-----------------|------------------|------------------------------------------|
//! | `pdf`           | `hybrid` (auto)  | converter, then OCR; higher quality wins |
//! | `doc`, `docx`   | `converter_only` | converter                                |
//! | `image`         | `ocr_only`       | OCR                                      |
//! | `url`           | `url_extraction` | web extraction with engine fallback      |
//! | `text`, `txt`   | `text_analysis`  | cleaning, segmentation, claims           |
//!
//! Converter, OCR and web output is passed through the text processor for
//! segments and claims when `detect_claims` is set.
//!
//! # Caching
//!
//! Successful results are stored under a key derived from the input kind,
//! the payload bytes and the options. Failures are never cached.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use docsift_domain::{InputKind, InputPayload};
//! use docsift_processor::{FocusedDocumentProcessor, MockOcr, ProcessingOptions};
//!
//! # async fn example() {
//! let processor = FocusedDocumentProcessor::new().with_ocr(Arc::new(MockOcr::default()));
//!
//! let payload = InputPayload::binary(InputKind::Image, std::fs::read("scan.png").unwrap(), "scan.png");
//! let result = processor.process_document(&payload, &ProcessingOptions::default()).await;
//! println!("{}: {} claims", result.success, result.claims.len());
//! # }
//! ```

#![warn(missing_docs)]

mod assemble;
pub mod clients;
mod config;
mod error;
pub mod mock;
mod options;
mod processor;

pub use assemble::image_format;
pub use clients::{HttpDocumentConverter, HttpOcrService};
pub use config::{
    CacheConfig, ConfigError, ConverterConfig, DocsiftConfig, ExtractionConfig, OcrConfig,
};
pub use error::ProcessorError;
pub use mock::{MockConverter, MockOcr};
pub use options::{ProcessingOptions, QualityLevel, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
pub use processor::{
    resolve_strategy, FocusedDocumentProcessor, ProcessorStatistics, URL_TIMEOUT_CAP_SECS,
};
