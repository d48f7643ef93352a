//! Capabilities command implementation.

use crate::error::Result;
use crate::output::Formatter;
use docsift_processor::FocusedDocumentProcessor;

/// Execute the capabilities command.
pub fn execute_capabilities(
    processor: &FocusedDocumentProcessor,
    formatter: &Formatter,
) -> Result<()> {
    let stats = processor.statistics();
    let text = processor.text_processor().capabilities();
    println!("{}", formatter.format_capabilities(&stats, &text)?);
    Ok(())
}
