//! Named tool operations shared by the MCP server and the `call` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::indexer::Indexer;
use crate::render::{format_folded_view, format_search_results};
use crate::search::{search_codebase, SearchOptions, DEFAULT_MAX_RESULTS};
use crate::symbol::unfold_symbol;

pub const SMART_SEARCH: &str = "smart_search";
pub const SMART_OUTLINE: &str = "smart_outline";
pub const SMART_UNFOLD: &str = "smart_unfold";

/// Every tool name with its description.
pub const TOOLS: [(&str, &str); 3] = [
    (
        SMART_SEARCH,
        "Search codebase for symbols, functions, classes using tree-sitter AST parsing. Returns folded structural views with token counts.",
    ),
    (
        SMART_OUTLINE,
        "Get structural outline of a file with symbol signatures and folded bodies.",
    ),
    (
        SMART_UNFOLD,
        "Expand one symbol from a file and return full source for that symbol only.",
    ),
];

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Arguments of `smart_search`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchArgs {
    #[schemars(description = "Symbol name, fragment or phrase to search for")]
    pub query: String,

    #[schemars(description = "Directory to search (default: server root)")]
    pub path: Option<String>,

    #[schemars(description = "Maximum number of matching symbols (default: 20)")]
    pub max_results: Option<usize>,

    #[schemars(description = "Only search files whose relative path contains this text")]
    pub file_pattern: Option<String>,
}

/// Arguments of `smart_outline`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct OutlineArgs {
    #[schemars(description = "Path of the file to outline")]
    pub file_path: String,
}

/// Arguments of `smart_unfold`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UnfoldArgs {
    #[schemars(description = "Path of the file containing the symbol")]
    pub file_path: String,

    #[schemars(description = "Symbol name, or Parent.child for nested symbols")]
    pub symbol_name: String,
}

/// Tool handlers bound to an indexer and a root directory.
#[derive(Clone)]
pub struct Tools {
    indexer: Arc<Indexer>,
    root: PathBuf,
    default_limit: usize,
}

impl Tools {
    pub fn new(indexer: Arc<Indexer>, root: impl Into<PathBuf>) -> Self {
        Self {
            indexer,
            root: root.into(),
            default_limit: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read(&self, path: &Path) -> Result<String, ToolError> {
        std::fs::read_to_string(path).map_err(|source| ToolError::Read {
            path: path.display().to_string(),
            source,
        })
    }

    /// Dispatch a tool by name with JSON arguments.
    pub fn call_tool(&self, name: &str, args: serde_json::Value) -> Result<String, ToolError> {
        let args = match args {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other,
        };

        match name {
            SMART_SEARCH => self.smart_search(parse_args(name, args)?),
            SMART_OUTLINE => self.smart_outline(parse_args(name, args)?),
            SMART_UNFOLD => self.smart_unfold(parse_args(name, args)?),
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    pub fn smart_search(&self, args: SearchArgs) -> Result<String, ToolError> {
        let root = match args.path.as_deref() {
            Some(path) => self.resolve(path),
            None => self.root.clone(),
        };
        let options = SearchOptions {
            max_results: args.max_results.filter(|n| *n > 0).unwrap_or(self.default_limit),
            file_pattern: args.file_pattern,
        };

        info!("smart_search '{}' in {}", args.query, root.display());
        let result = search_codebase(&self.indexer, &root, &args.query, &options);
        Ok(format_search_results(&result, &args.query))
    }

    pub fn smart_outline(&self, args: OutlineArgs) -> Result<String, ToolError> {
        let path = self.resolve(&args.file_path);
        let content = self.read(&path)?;
        let file = self.indexer.index_file(&content, &path.to_string_lossy());

        if file.symbols.is_empty() {
            return Ok(format!(
                "Could not parse {}. File may use an unsupported language or be empty.",
                args.file_path
            ));
        }
        Ok(format_folded_view(&file))
    }

    pub fn smart_unfold(&self, args: UnfoldArgs) -> Result<String, ToolError> {
        let path = self.resolve(&args.file_path);
        let display = path.to_string_lossy();
        let content = self.read(&path)?;

        let file = self.indexer.index_file(&content, &display);
        if let Some(unfolded) =
            unfold_symbol(&self.indexer, &content, &display, &args.symbol_name, Some(&file))
        {
            return Ok(unfolded);
        }

        if file.symbols.is_empty() {
            return Ok(format!(
                "Could not parse {}. File may be unsupported or empty.",
                args.file_path
            ));
        }

        let available = file
            .symbols
            .iter()
            .map(|s| format!("  - {} ({})", s.name, s.kind))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!(
            "Symbol \"{}\" not found in {}.\n\nAvailable symbols:\n{}",
            args.symbol_name, args.file_path, available
        ))
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}
