use anyhow::{Context, Result};
use std::sync::Arc;

use crate::indexer::Indexer;
use crate::tools::Tools;
use crate::Config;

/// Invoke a tool by name, exactly as an MCP client would
pub fn run(config: &Config, tool: &str, args: &str) -> Result<()> {
    let cwd = std::env::current_dir()?;

    let args: serde_json::Value =
        serde_json::from_str(args).with_context(|| format!("Invalid JSON arguments: {}", args))?;

    let tools = Tools::new(Arc::new(Indexer::from_config(config)?), cwd)
        .with_default_limit(config.search.default_limit);
    let out = tools.call_tool(tool, args)?;
    println!("{}", out);

    Ok(())
}
