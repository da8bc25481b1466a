use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codefold")]
#[command(author, version, about = "Folded structural code search CLI and MCP server")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .codefold/config.toml in the current directory
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Start the MCP server on stdio
    Serve,

    /// Fuzzy-search symbols and show folded views of matching files
    Search {
        /// Search query
        query: String,

        /// Directory to search (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Maximum number of matching symbols
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only search files whose relative path contains this text
        #[arg(short, long)]
        file_pattern: Option<String>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the folded outline of one file
    Outline {
        /// File to outline
        file: PathBuf,

        /// Print the outline as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the full source of one symbol
    Unfold {
        /// File containing the symbol
        file: PathBuf,

        /// Symbol name, or Parent.child
        symbol: String,
    },

    /// Invoke a tool by name with JSON arguments
    Call {
        /// Tool name (smart_search, smart_outline, smart_unfold)
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Index the tree and show degraded files and metrics
    Stats {
        /// Directory to index (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Output in Prometheus format
        #[arg(long)]
        prometheus: bool,
    },
}
