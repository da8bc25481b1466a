use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::indexer::Indexer;
use crate::render::format_search_results;
use crate::search::{search_codebase, SearchOptions};
use crate::Config;

/// Run the search command
///
/// Walks the tree under `path` (default: current directory), indexes every
/// readable source file and prints the ranked symbols with folded file views.
pub fn run(
    config: &Config,
    query: &str,
    path: Option<PathBuf>,
    limit: Option<usize>,
    file_pattern: Option<String>,
    json: bool,
) -> Result<()> {
    let cwd = env::current_dir()?;
    let root = path.map(|p| cwd.join(p)).unwrap_or_else(|| cwd.clone());

    let indexer = Indexer::from_config(config)?;
    let options = SearchOptions {
        max_results: limit.unwrap_or(config.search.default_limit),
        file_pattern,
    };

    let result = search_codebase(&indexer, &root, query, &options);

    if json {
        let out = serde_json::to_string_pretty(&result).context("Failed to serialize search result")?;
        println!("{}", out);
    } else {
        println!("{}", format_search_results(&result, query));
    }

    if !result.degraded_files.is_empty() {
        eprintln!(
            "\n{} file(s) indexed without symbols; run 'codefold stats' for details",
            result.degraded_files.len()
        );
    }

    Ok(())
}
