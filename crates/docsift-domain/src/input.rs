//! Input payloads accepted by the processor

use crate::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of document being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// PDF document (binary)
    Pdf,
    /// Legacy Word document (binary)
    Doc,
    /// Word document (binary)
    Docx,
    /// Plain-text file (string)
    Txt,
    /// Web page address (string)
    Url,
    /// Raw text (string)
    Text,
    /// Raster image (binary)
    Image,
}

impl InputKind {
    /// All kinds, in declaration order
    pub const ALL: [InputKind; 7] = [
        InputKind::Pdf,
        InputKind::Doc,
        InputKind::Docx,
        InputKind::Txt,
        InputKind::Url,
        InputKind::Text,
        InputKind::Image,
    ];

    /// Whether this kind carries a byte payload
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            InputKind::Pdf | InputKind::Doc | InputKind::Docx | InputKind::Image
        )
    }

    /// Lowercase name used in cache keys and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Pdf => "pdf",
            InputKind::Doc => "doc",
            InputKind::Docx => "docx",
            InputKind::Txt => "txt",
            InputKind::Url => "url",
            InputKind::Text => "text",
            InputKind::Image => "image",
        }
    }

    /// Guess the kind from a file name extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(InputKind::Pdf),
            "doc" => Some(InputKind::Doc),
            "docx" => Some(InputKind::Docx),
            "txt" | "md" => Some(InputKind::Txt),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "webp" => Some(InputKind::Image),
            _ => None,
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown input kind: {}", s))
    }
}

/// Payload body: bytes for binary kinds, a string for textual kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadData {
    /// Raw document bytes
    Binary(Vec<u8>),
    /// UTF-8 text or a URL
    Text(String),
}

impl PayloadData {
    /// Bytes used for content addressing
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PayloadData::Binary(bytes) => bytes,
            PayloadData::Text(text) => text.as_bytes(),
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A document submitted for processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPayload {
    /// Document kind
    pub kind: InputKind,
    /// Payload body
    pub data: PayloadData,
    /// Original file name, if any
    pub filename: Option<String>,
    /// Caller-supplied metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl InputPayload {
    /// Raw text payload
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(InputKind::Text, PayloadData::Text(text.into()))
    }

    /// URL payload
    pub fn url(url: impl Into<String>) -> Self {
        Self::new(InputKind::Url, PayloadData::Text(url.into()))
    }

    /// Binary payload of the given kind
    pub fn binary(kind: InputKind, bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self::new(kind, PayloadData::Binary(bytes)).with_filename(filename)
    }

    fn new(kind: InputKind, data: PayloadData) -> Self {
        Self {
            kind,
            data,
            filename: None,
            metadata: Metadata::new(),
        }
    }

    /// Attach a file name
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Check that the payload body matches the declared kind
    pub fn check_shape(&self) -> Result<(), String> {
        match (&self.data, self.kind.is_binary()) {
            (PayloadData::Binary(_), true) | (PayloadData::Text(_), false) => Ok(()),
            (PayloadData::Text(_), true) => Err(format!(
                "Input kind '{}' requires a binary payload",
                self.kind
            )),
            (PayloadData::Binary(_), false) => Err(format!(
                "Input kind '{}' requires a text payload",
                self.kind
            )),
        }
    }

    /// The text body for textual kinds
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            PayloadData::Text(text) => Some(text),
            PayloadData::Binary(_) => None,
        }
    }
}
