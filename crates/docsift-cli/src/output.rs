//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use docsift_domain::{ExtractedContent, ProcessingResult};
use docsift_processor::ProcessorStatistics;
use docsift_text::TextCapabilities;
use serde_json::json;

/// Characters of extracted text shown in summaries
const PREVIEW_CHARS: usize = 400;

/// Claims listed in summaries
const MAX_LISTED_CLAIMS: usize = 10;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a processing result.
    pub fn format_result(&self, result: &ProcessingResult) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            CliFormat::Summary => Ok(self.result_summary(result)),
        }
    }

    /// Format directly extracted web content.
    pub fn format_content(&self, content: &ExtractedContent) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(content)?),
            CliFormat::Summary => {
                let mut lines = vec![self.success(&format!(
                    "Extracted {} with {} in {:.2}s",
                    content.url, content.strategy_used, content.processing_time
                ))];
                if let Some(title) = &content.title {
                    lines.push(format!("  Title:    {}", title));
                }
                if let Some(author) = &content.author {
                    lines.push(format!("  Author:   {}", author));
                }
                if let Some(date) = &content.publish_date {
                    lines.push(format!("  Date:     {}", date.format("%Y-%m-%d")));
                }
                lines.push(format!(
                    "  Quality:  {:.2}  Type: {:?}  Language: {}",
                    content.quality_score,
                    content.content_type,
                    content.language.as_deref().unwrap_or("unknown")
                ));
                lines.push(String::new());
                lines.push(preview(&content.text));
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format processor statistics and text capabilities.
    pub fn format_capabilities(
        &self,
        stats: &ProcessorStatistics,
        text: &TextCapabilities,
    ) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "processor": stats,
                "text": text,
            }))?),
            CliFormat::Summary => {
                let mut lines = vec![self.colorize("Processors", "cyan")];
                for (name, available) in &stats.available_processors {
                    let status = if *available {
                        self.colorize("available", "green")
                    } else {
                        self.colorize("not configured", "yellow")
                    };
                    lines.push(format!("  {:<16}{}", name, status));
                }
                lines.push(format!(
                    "  Engines:        {}",
                    join(stats.extraction_strategies.iter())
                ));
                lines.push(format!(
                    "  Input kinds:    {}",
                    join(stats.supported_input_kinds.iter())
                ));
                lines.push(format!(
                    "  Segmentation:   {}",
                    join(text.segmentation_strategies.iter())
                ));
                lines.push(format!(
                    "  Languages:      {}",
                    text.supported_languages.join(" ")
                ));
                lines.push(format!(
                    "  Cache:          {}",
                    if stats.cache_enabled { "enabled" } else { "disabled" }
                ));
                Ok(lines.join("\n"))
            }
        }
    }

    fn result_summary(&self, result: &ProcessingResult) -> String {
        let stats = &result.processing_stats;
        if !result.success {
            let mut lines = vec![self.error(&format!(
                "Processing {} input failed",
                result.input_kind
            ))];
            lines.extend(result.errors.iter().map(|e| format!("  {}", e)));
            return lines.join("\n");
        }

        let mut lines = vec![self.success(&format!(
            "Processed {} with {} in {:.2}s{}",
            result.input_kind,
            result.strategy_used,
            stats.processing_time,
            if result.cache_hit { " (cached)" } else { "" }
        ))];
        if !stats.processors_used.is_empty() {
            lines.push(format!("  Processors: {}", stats.processors_used.join(", ")));
        }
        lines.push(format!(
            "  Quality: {:.2}  Words: {}  Segments: {}  Claims: {}",
            stats.quality_score,
            stats.word_count,
            result.segments.len(),
            stats.claim_count
        ));
        if let Some(language) = &result.language {
            lines.push(format!("  Language: {}", language));
        }
        if let Some(pages) = stats.page_count {
            lines.push(format!("  Pages: {}  Tables: {}", pages, stats.table_count));
        }
        for warning in &result.warnings {
            lines.push(self.warning(warning));
        }

        if !result.claims.is_empty() {
            lines.push(String::new());
            lines.push(self.colorize("Claims", "cyan"));
            for (i, claim) in result.claims.iter().take(MAX_LISTED_CLAIMS).enumerate() {
                lines.push(format!(
                    "  {}. [{:.2}] {} ({})",
                    i + 1,
                    claim.confidence,
                    claim.text,
                    claim.claim_kind
                ));
            }
            if result.claims.len() > MAX_LISTED_CLAIMS {
                lines.push(format!(
                    "  ... and {} more",
                    result.claims.len() - MAX_LISTED_CLAIMS
                ));
            }
        }

        lines.push(String::new());
        lines.push(preview(&result.text));
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().bold().to_string(),
            _ => text.to_string(),
        }
    }
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(" ")
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
