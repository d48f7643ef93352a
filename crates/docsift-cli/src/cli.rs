//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use docsift_domain::{ExtractionStrategy, InputKind, ProcessingStrategy, SegmentationStrategy};
use std::path::PathBuf;

/// Docsift - Extract text, structure and claims from documents and web pages.
#[derive(Debug, Parser)]
#[command(name = "docsift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "summary")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.docsift/config.toml)
    #[arg(short, long, global = true, env = "DOCSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the result cache lookup
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable summary (default)
    Summary,
    /// Full result as JSON
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze raw text
    Text(TextArgs),

    /// Extract the main content of a web page
    Url(UrlArgs),

    /// Process a document file (PDF, Word, image, text)
    File(FileArgs),

    /// Show available processors and supported inputs
    Capabilities,
}

/// Arguments for the text command.
#[derive(Debug, Parser)]
pub struct TextArgs {
    /// Text to analyze
    #[arg(required_unless_present = "file")]
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(short = 'i', long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Segmentation strategy
    #[arg(short, long, value_enum)]
    pub segmentation: Option<SegmentationArg>,

    /// Minimum claim confidence (0.0-1.0)
    #[arg(short = 't', long)]
    pub claim_threshold: Option<f64>,
}

/// Arguments for the url command.
#[derive(Debug, Parser)]
pub struct UrlArgs {
    /// Page address
    pub url: String,

    /// Extraction engine
    #[arg(short, long, value_enum, default_value = "auto")]
    pub strategy: EngineArg,

    /// Minimum quality score before falling back to other engines (0.0-1.0)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Overall timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the file command.
#[derive(Debug, Parser)]
pub struct FileArgs {
    /// Document path
    pub path: PathBuf,

    /// Input kind (default: from the file extension)
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// PDF processing mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Always run OCR on PDFs
    #[arg(long)]
    pub force_ocr: bool,

    /// Keep images in the output
    #[arg(long)]
    pub include_images: bool,

    /// Skip claim detection
    #[arg(long)]
    pub no_claims: bool,
}

/// Segmentation strategy argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SegmentationArg {
    /// Blank-line separated paragraphs
    Paragraph,
    /// Groups of sentences
    Sentence,
    /// Semantic grouping
    Semantic,
    /// Topic grouping
    Topic,
    /// Windows around claims
    ClaimBased,
}

/// Extraction engine argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum EngineArg {
    /// Choose from the URL
    Auto,
    /// Metadata-driven article parser
    Structured,
    /// Mozilla Readability
    Readability,
    /// Boilerplate removal
    Boilerplate,
    /// Selector cascade
    Custom,
}

/// Input kind argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum KindArg {
    /// PDF document
    Pdf,
    /// Legacy Word document
    Doc,
    /// Word document
    Docx,
    /// Plain-text file
    Txt,
    /// Raster image
    Image,
}

/// PDF processing mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Converter, then OCR
    Hybrid,
    /// Converter, OCR only as a fallback
    ConverterOnly,
    /// OCR only
    OcrOnly,
}

impl From<SegmentationArg> for SegmentationStrategy {
    fn from(arg: SegmentationArg) -> Self {
        match arg {
            SegmentationArg::Paragraph => SegmentationStrategy::Paragraph,
            SegmentationArg::Sentence => SegmentationStrategy::Sentence,
            SegmentationArg::Semantic => SegmentationStrategy::Semantic,
            SegmentationArg::Topic => SegmentationStrategy::Topic,
            SegmentationArg::ClaimBased => SegmentationStrategy::ClaimBased,
        }
    }
}

impl From<EngineArg> for ExtractionStrategy {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Auto => ExtractionStrategy::Auto,
            EngineArg::Structured => ExtractionStrategy::Structured,
            EngineArg::Readability => ExtractionStrategy::Readability,
            EngineArg::Boilerplate => ExtractionStrategy::Boilerplate,
            EngineArg::Custom => ExtractionStrategy::Custom,
        }
    }
}

impl From<KindArg> for InputKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Pdf => InputKind::Pdf,
            KindArg::Doc => InputKind::Doc,
            KindArg::Docx => InputKind::Docx,
            KindArg::Txt => InputKind::Txt,
            KindArg::Image => InputKind::Image,
        }
    }
}

impl From<ModeArg> for ProcessingStrategy {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Hybrid => ProcessingStrategy::Hybrid,
            ModeArg::ConverterOnly => ProcessingStrategy::ConverterOnly,
            ModeArg::OcrOnly => ProcessingStrategy::OcrOnly,
        }
    }
}
