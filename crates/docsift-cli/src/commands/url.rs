//! Url command implementation.

use crate::cli::UrlArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docsift_domain::ExtractionOptions;
use docsift_processor::{FocusedDocumentProcessor, ProcessingOptions, URL_TIMEOUT_CAP_SECS};

/// Execute the url command.
///
/// Calls the extractor directly so the engine can be chosen; the result
/// cache is not involved.
pub async fn execute_url(
    args: UrlArgs,
    processor: &FocusedDocumentProcessor,
    options: &ProcessingOptions,
    formatter: &Formatter,
) -> Result<()> {
    let defaults = processor.extraction_defaults();
    let threshold = args
        .threshold
        .unwrap_or_else(|| options.quality_threshold.threshold());
    if !(0.0..=1.0).contains(&threshold) {
        return Err(CliError::InvalidInput(
            "Threshold must be between 0.0 and 1.0".to_string(),
        ));
    }

    let extraction = ExtractionOptions {
        strategy: args.strategy.into(),
        quality_threshold: threshold,
        timeout_secs: args
            .timeout
            .unwrap_or_else(|| options.timeout_secs.min(URL_TIMEOUT_CAP_SECS)),
        include_metadata: options.include_metadata,
        include_images: options.include_images,
        ..defaults.clone()
    };

    let content = processor.extract_url(&args.url, &extraction).await?;
    println!("{}", formatter.format_content(&content)?);
    Ok(())
}
