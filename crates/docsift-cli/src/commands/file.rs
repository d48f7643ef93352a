//! File command implementation.

use crate::cli::FileArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docsift_domain::{InputKind, InputPayload};
use docsift_processor::{FocusedDocumentProcessor, ProcessingOptions};
use std::path::Path;
use tracing::debug;

/// Execute the file command.
///
/// Returns whether processing succeeded.
pub async fn execute_file(
    args: FileArgs,
    processor: &FocusedDocumentProcessor,
    mut options: ProcessingOptions,
    formatter: &Formatter,
) -> Result<bool> {
    let filename = file_name(&args.path)?;
    let kind = match args.kind {
        Some(kind) => kind.into(),
        None => InputKind::from_filename(&filename).ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Cannot infer input kind from '{}', use --kind",
                filename
            ))
        })?,
    };

    let bytes = tokio::fs::read(&args.path).await?;
    debug!("Read {} ({} bytes) as {}", filename, bytes.len(), kind);
    let payload = payload(kind, bytes, filename)?;

    if let Some(mode) = args.mode {
        options.strategy = mode.into();
    }
    options.force_ocr |= args.force_ocr;
    options.include_images |= args.include_images;
    if args.no_claims {
        options.detect_claims = false;
    }

    let result = processor.process_document(&payload, &options).await;
    println!("{}", formatter.format_result(&result)?);
    Ok(result.success)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::InvalidInput(format!("Not a file: {}", path.display())))
}

/// Payload for a file of `kind`; text files must be UTF-8
fn payload(kind: InputKind, bytes: Vec<u8>, filename: String) -> Result<InputPayload> {
    if kind.is_binary() {
        return Ok(InputPayload::binary(kind, bytes, filename));
    }

    let text = String::from_utf8(bytes)
        .map_err(|_| CliError::InvalidInput(format!("{} is not valid UTF-8", filename)))?;
    let mut payload = InputPayload::text(text).with_filename(filename);
    payload.kind = kind;
    Ok(payload)
}
