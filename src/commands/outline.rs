use anyhow::{Context, Result};
use std::path::Path;

use crate::indexer::Indexer;
use crate::render::format_folded_view;
use crate::Config;

/// Print the folded outline of one file
pub fn run(config: &Config, file: &Path, json: bool) -> Result<()> {
    let indexer = Indexer::from_config(config)?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let outline = indexer.index_file(&content, &file.to_string_lossy());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outline).context("Failed to serialize outline")?
        );
    } else {
        println!("{}", format_folded_view(&outline));
    }

    for degraded in indexer.diagnostics().degraded_files() {
        eprintln!("Note: {} ({})", degraded.path, degraded.reason);
    }

    Ok(())
}
