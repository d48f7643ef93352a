//! Text command implementation.

use crate::cli::TextArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docsift_domain::InputPayload;
use docsift_processor::{FocusedDocumentProcessor, ProcessingOptions};

/// Execute the text command.
///
/// Returns whether processing succeeded.
pub async fn execute_text(
    args: TextArgs,
    processor: &FocusedDocumentProcessor,
    mut options: ProcessingOptions,
    formatter: &Formatter,
) -> Result<bool> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
        (None, None) => {
            return Err(CliError::InvalidInput(
                "Provide text or --file".to_string(),
            ))
        }
    };

    if let Some(threshold) = args.claim_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CliError::InvalidInput(
                "Claim threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        options.claim_confidence_threshold = threshold;
    }
    if let Some(segmentation) = args.segmentation {
        options.segmentation_strategy = segmentation.into();
    }

    let result = processor.process_document(&InputPayload::text(text), &options).await;
    println!("{}", formatter.format_result(&result)?);
    Ok(result.success)
}
