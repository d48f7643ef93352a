//! Deterministic collaborators for tests
//!
//! Both mocks return a canned output, can be switched to fail, can be slowed
//! down to exercise deadlines, and count their calls. Clones share state.

use async_trait::async_trait;
use docsift_domain::{
    CollaboratorError, ConvertedDocument, DocumentConverter, OcrOptions, OcrOutput, OcrService,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock document converter
///
/// # Examples
///
/// ```
/// use docsift_domain::{ConvertedDocument, DocumentConverter};
/// use docsift_processor::MockConverter;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let converter = MockConverter::new(ConvertedDocument {
///     text: "Converted text".to_string(),
///     ..Default::default()
/// });
/// let doc = converter.convert(b"%PDF", "a.pdf").await.unwrap();
/// assert_eq!(doc.text, "Converted text");
/// assert_eq!(converter.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    output: ConvertedDocument,
    error: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Duration>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockConverter {
    /// Converter returning `output` for every document
    pub fn new(output: ConvertedDocument) -> Self {
        Self {
            output,
            error: Arc::new(Mutex::new(None)),
            delay: Arc::new(Mutex::new(Duration::ZERO)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Converter failing every call with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let converter = Self::default();
        converter.set_error(message);
        converter
    }

    /// Fail subsequent calls with `message`
    pub fn set_error(&self, message: impl Into<String>) {
        *self.error.lock().unwrap() = Some(message.into());
    }

    /// Wait `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Number of `convert` calls
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new(ConvertedDocument {
            text: "Default mock conversion".to_string(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl DocumentConverter for MockConverter {
    async fn convert(
        &self,
        _bytes: &[u8],
        _filename: &str,
    ) -> Result<ConvertedDocument, CollaboratorError> {
        *self.call_count.lock().unwrap() += 1;
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let error = self.error.lock().unwrap().clone();
        match error {
            Some(message) => Err(CollaboratorError::Failed(message)),
            None => Ok(self.output.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "mock-converter"
    }
}

/// Mock OCR service
#[derive(Debug, Clone)]
pub struct MockOcr {
    output: OcrOutput,
    error: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Duration>>,
    call_count: Arc<Mutex<usize>>,
    formats: Arc<Mutex<Vec<String>>>,
}

impl MockOcr {
    /// Service returning `output` for every image and PDF
    pub fn new(output: OcrOutput) -> Self {
        Self {
            output,
            error: Arc::new(Mutex::new(None)),
            delay: Arc::new(Mutex::new(Duration::ZERO)),
            call_count: Arc::new(Mutex::new(0)),
            formats: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Service failing every call with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let ocr = Self::default();
        ocr.set_error(message);
        ocr
    }

    /// Fail subsequent calls with `message`
    pub fn set_error(&self, message: impl Into<String>) {
        *self.error.lock().unwrap() = Some(message.into());
    }

    /// Wait `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Number of OCR calls
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Formats seen by `process_image`, with `pdf` for PDF calls
    pub fn formats(&self) -> Vec<String> {
        self.formats.lock().unwrap().clone()
    }

    async fn answer(&self, format: &str) -> Result<OcrOutput, CollaboratorError> {
        *self.call_count.lock().unwrap() += 1;
        self.formats.lock().unwrap().push(format.to_string());
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let error = self.error.lock().unwrap().clone();
        match error {
            Some(message) => Err(CollaboratorError::Failed(message)),
            None => Ok(self.output.clone()),
        }
    }
}

impl Default for MockOcr {
    fn default() -> Self {
        Self::new(OcrOutput {
            text: "Default mock OCR text".to_string(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl OcrService for MockOcr {
    async fn process_image(
        &self,
        _bytes: &[u8],
        format: &str,
        _options: &OcrOptions,
    ) -> Result<OcrOutput, CollaboratorError> {
        self.answer(format).await
    }

    async fn process_pdf(
        &self,
        _bytes: &[u8],
        _pages: Option<&[u32]>,
        _options: &OcrOptions,
    ) -> Result<OcrOutput, CollaboratorError> {
        self.answer("pdf").await
    }

    fn name(&self) -> &'static str {
        "mock-ocr"
    }
}
