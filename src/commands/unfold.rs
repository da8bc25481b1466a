use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::indexer::Indexer;
use crate::tools::{Tools, UnfoldArgs};
use crate::Config;

/// Print the full source of one symbol, or the symbols available in the file
pub fn run(config: &Config, file: &Path, symbol: &str) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let tools = Tools::new(Arc::new(Indexer::from_config(config)?), cwd);

    let out = tools.smart_unfold(UnfoldArgs {
        file_path: file.to_string_lossy().into_owned(),
        symbol_name: symbol.to_string(),
    })?;
    println!("{}", out);

    Ok(())
}
