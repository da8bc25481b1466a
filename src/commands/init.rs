use anyhow::{bail, Result};
use std::env;
use tracing::info;

use crate::Config;

pub fn run(force: bool) -> Result<()> {
    let root = env::current_dir()?;

    if Config::is_initialized(&root) && !force {
        bail!(
            "codefold is already initialized in {:?} (use --force to overwrite)",
            Config::codefold_dir(&root)
        );
    }

    let config = Config::default();
    config.save(&root)?;

    info!("Initialized codefold in {:?}", Config::codefold_dir(&root));
    println!(
        "✓ Created {} with default configuration",
        Config::codefold_dir(&root).display()
    );
    println!("\nNext steps:");
    println!("  1. Edit .codefold/config.toml to choose the query engine and ignore lists");
    println!("  2. Run 'codefold search <query>' to try a search");
    println!("  3. Run 'codefold serve' to start the MCP server");

    Ok(())
}
