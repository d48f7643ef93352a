//! Error kind discriminant shared by every crate
//!
//! Each crate keeps its own `thiserror` enum; all of them map onto this
//! discriminant so callers can branch on the failure class without caring
//! which layer produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure class of a pipeline error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input shape or size; no engine was invoked
    Validation,
    /// The requested engine is not compiled in or disabled
    EngineUnavailable,
    /// A single engine attempt failed
    ExtractionFailure,
    /// Every engine was tried and the best score stayed under the threshold
    QualityBelowThreshold,
    /// The overall request deadline expired
    TimeoutExceeded,
    /// Text was too short before or after cleaning
    TextTooShort,
    /// Claim detection failed
    ClaimDetection,
    /// An external collaborator (converter, OCR) failed
    Collaborator,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Stable snake_case name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::EngineUnavailable => "engine_unavailable",
            ErrorKind::ExtractionFailure => "extraction_failure",
            ErrorKind::QualityBelowThreshold => "quality_below_threshold",
            ErrorKind::TimeoutExceeded => "timeout_exceeded",
            ErrorKind::TextTooShort => "text_too_short",
            ErrorKind::ClaimDetection => "claim_detection",
            ErrorKind::Collaborator => "collaborator",
            ErrorKind::Internal => "internal",
        }
    }

    /// Whether this kind ends the request rather than degrading it
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ErrorKind::Validation
                | ErrorKind::QualityBelowThreshold
                | ErrorKind::TimeoutExceeded
                | ErrorKind::TextTooShort
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
