//! Best-effort language detection
//!
//! Detection never fails the pipeline. A backend error degrades to English at
//! confidence 0.3; a detector without a backend reports English at 0.5.

use docsift_domain::LanguageInfo;
use std::sync::Arc;
use tracing::{debug, warn};
use whatlang::Lang;

/// Characters sampled from the start of the text
pub const SAMPLE_CHARS: usize = 1000;

/// ISO 639-1 codes for the languages `whatlang` identifies; others keep their 639-3 code
const ISO_639_1: [(Lang, &str); 30] = [
    (Lang::Eng, "en"),
    (Lang::Spa, "es"),
    (Lang::Fra, "fr"),
    (Lang::Deu, "de"),
    (Lang::Ita, "it"),
    (Lang::Por, "pt"),
    (Lang::Nld, "nl"),
    (Lang::Rus, "ru"),
    (Lang::Cmn, "zh"),
    (Lang::Jpn, "ja"),
    (Lang::Kor, "ko"),
    (Lang::Ara, "ar"),
    (Lang::Hin, "hi"),
    (Lang::Pol, "pl"),
    (Lang::Tur, "tr"),
    (Lang::Swe, "sv"),
    (Lang::Dan, "da"),
    (Lang::Nob, "nb"),
    (Lang::Fin, "fi"),
    (Lang::Ces, "cs"),
    (Lang::Ukr, "uk"),
    (Lang::Ell, "el"),
    (Lang::Heb, "he"),
    (Lang::Hun, "hu"),
    (Lang::Ron, "ro"),
    (Lang::Cat, "ca"),
    (Lang::Vie, "vi"),
    (Lang::Ind, "id"),
    (Lang::Tha, "th"),
    (Lang::Bul, "bg"),
];

/// ISO 639-1 code for `lang`, falling back to its ISO 639-3 code
pub fn language_code(lang: Lang) -> &'static str {
    ISO_639_1
        .iter()
        .find(|(candidate, _)| *candidate == lang)
        .map(|(_, code)| *code)
        .unwrap_or_else(|| lang.code())
}

/// Every language code the default backend can report
pub fn supported_languages() -> Vec<String> {
    let mut codes: Vec<String> = Lang::all()
        .iter()
        .map(|lang| language_code(*lang).to_string())
        .collect();
    codes.sort();
    codes.dedup();
    codes
}

/// A language identification backend
pub trait LanguageBackend: Send + Sync {
    /// Ranked `(code, probability)` candidates, best first
    fn detect(&self, sample: &str) -> Result<Vec<(String, f64)>, String>;

    /// Name used in logs and capability reports
    fn name(&self) -> &'static str;
}

/// Detects language through an optional backend
#[derive(Clone)]
pub struct LanguageDetector {
    backend: Option<Arc<dyn LanguageBackend>>,
}

impl LanguageDetector {
    /// Detector with the given backend
    pub fn new(backend: Arc<dyn LanguageBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Detector with no backend; always reports the fallback language
    pub fn without_backend() -> Self {
        Self { backend: None }
    }

    /// Whether a backend is configured
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Detect the language of `text` from its first [`SAMPLE_CHARS`] characters
    pub fn detect(&self, text: &str) -> LanguageInfo {
        let Some(backend) = &self.backend else {
            return fallback(0.5);
        };

        let sample: String = text.chars().take(SAMPLE_CHARS).collect();
        match backend.detect(&sample) {
            Ok(candidates) if !candidates.is_empty() => {
                let (language, confidence) = candidates[0].clone();
                debug!("Detected language {} ({:.2}) via {}", language, confidence, backend.name());
                LanguageInfo {
                    language,
                    confidence: confidence.clamp(0.0, 1.0),
                    alternatives: candidates.into_iter().take(3).collect(),
                }
            }
            Ok(_) => {
                warn!("Language detection returned no candidates");
                fallback(0.3)
            }
            Err(e) => {
                warn!("Language detection failed: {}", e);
                fallback(0.3)
            }
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(Arc::new(WhatlangBackend))
    }
}

fn fallback(confidence: f64) -> LanguageInfo {
    LanguageInfo {
        language: "en".to_string(),
        confidence,
        alternatives: vec![("en".to_string(), confidence)],
    }
}

/// Trigram based backend on `whatlang`
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangBackend;

impl LanguageBackend for WhatlangBackend {
    fn detect(&self, sample: &str) -> Result<Vec<(String, f64)>, String> {
        let info = whatlang::detect(sample).ok_or_else(|| "no language identified".to_string())?;
        Ok(vec![(language_code(info.lang()).to_string(), info.confidence())])
    }

    fn name(&self) -> &'static str {
        "whatlang"
    }
}

/// Backend that always reports one language; for deterministic tests
#[derive(Debug, Clone)]
pub struct FixedLanguageBackend {
    language: String,
    confidence: f64,
}

impl FixedLanguageBackend {
    /// Always report `language` at `confidence`
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            language: language.into(),
            confidence,
        }
    }
}

impl LanguageBackend for FixedLanguageBackend {
    fn detect(&self, _sample: &str) -> Result<Vec<(String, f64)>, String> {
        Ok(vec![(self.language.clone(), self.confidence)])
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
