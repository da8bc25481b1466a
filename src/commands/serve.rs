//! MCP server command implementation.
//!
//! Starts the codefold MCP server on stdio. Nothing but protocol frames may
//! reach stdout, so all diagnostics go through `tracing`.

use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::indexer::Indexer;
use crate::mcp::CodefoldServer;
use crate::tools::Tools;

/// Run the MCP server command
pub async fn run(config: &Config) -> Result<()> {
    let root = env::current_dir()?;
    let indexer = Indexer::from_config(config)?;
    info!(
        "Starting MCP server in {} ({} engine)",
        root.display(),
        indexer.engine_name()
    );

    let tools = Tools::new(Arc::new(indexer), root).with_default_limit(config.search.default_limit);
    CodefoldServer::new(tools).run().await?;

    info!("MCP server stopped");
    Ok(())
}
