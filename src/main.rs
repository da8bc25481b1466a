use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use codefold::cli::{Cli, Commands};
use codefold::config::Config;
use codefold::logging::{init_early_logging, init_logging};
use codefold::metrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine project root (current directory)
    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let loaded = Config::load(&project_root);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = match init_logging(&config.logging, &project_root) {
        Ok(guard) => Some(guard),
        Err(e) => {
            init_early_logging();
            tracing::warn!("File logging disabled: {:#}", e);
            None
        }
    };

    if let Err(e) = &loaded {
        tracing::warn!("{:#}; using default configuration", e);
    }

    tracing::debug!("codefold starting in {}", project_root.display());

    metrics::register_metrics();

    match cli.command {
        Commands::Init { force } => {
            codefold::commands::init::run(force)?;
        }
        Commands::Serve => {
            codefold::commands::serve::run(&config).await?;
        }
        Commands::Search {
            query,
            path,
            limit,
            file_pattern,
            json,
        } => {
            codefold::commands::search::run(&config, &query, path, limit, file_pattern, json)?;
        }
        Commands::Outline { file, json } => {
            codefold::commands::outline::run(&config, &file, json)?;
        }
        Commands::Unfold { file, symbol } => {
            codefold::commands::unfold::run(&config, &file, &symbol)?;
        }
        Commands::Call { tool, args } => {
            codefold::commands::call::run(&config, &tool, &args)?;
        }
        Commands::Stats { path, prometheus } => {
            codefold::commands::stats::run(&config, path, prometheus)?;
        }
    }

    Ok(())
}
