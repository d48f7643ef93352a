//! Docsift CLI - Command-line interface for document processing.

use anyhow::Context;
use clap::Parser;
use docsift_cli::{commands, config, Cli, Command, Formatter};
use docsift_processor::FocusedDocumentProcessor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let processor =
        FocusedDocumentProcessor::from_config(&config).context("Failed to start processor")?;

    let mut options = config.processing.clone();
    if cli.no_cache {
        options.bypass_cache = true;
    }

    let formatter = Formatter::new(cli.format, !cli.no_color);

    let success = match cli.command {
        Command::Text(args) => commands::execute_text(args, &processor, options, &formatter).await?,
        Command::File(args) => commands::execute_file(args, &processor, options, &formatter).await?,
        Command::Url(args) => {
            commands::execute_url(args, &processor, &options, &formatter).await?;
            true
        }
        Command::Capabilities => {
            commands::execute_capabilities(&processor, &formatter)?;
            true
        }
    };

    Ok(success)
}
