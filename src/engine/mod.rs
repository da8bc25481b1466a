//! Query engines that turn source files into tagged positional matches.
//!
//! Two backends share the same contract:
//! - [`NativeEngine`] runs tree-sitter queries in-process against the linked grammars
//! - [`TreeSitterCli`] shells out to `tree-sitter query` and parses its report
//!
//! Neither backend ever fails loudly towards the symbol builder: callers treat
//! an [`EngineError`] as "no symbols found" and record a diagnostic.

pub mod capture;
pub mod cli;
pub mod native;
pub mod queries;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::TempDir;
use thiserror::Error;

use crate::config::{EngineBackend, EngineConfig};
use crate::language::Language;

pub use capture::{parse_query_output, Capture, FileMatches, Match};
pub use cli::TreeSitterCli;
pub use native::NativeEngine;
pub use queries::QueryKey;

/// A file handed to the indexer.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path shown to callers (usually relative to the search root)
    pub relative_path: String,
    /// Location on disk, when the content came from a file
    pub absolute_path: Option<PathBuf>,
    pub content: String,
}

impl SourceFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            absolute_path: None,
            content: content.into(),
        }
    }

    pub fn with_absolute_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.absolute_path = Some(path.into());
        self
    }
}

/// Why an engine produced no usable output.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no grammar available for language '{0}'")]
    MissingGrammar(Language),

    #[error("failed to compile query for '{language}': {reason}")]
    Query { language: Language, reason: String },

    #[error("failed to parse source for '{0}'")]
    Parse(Language),

    #[error("failed to spawn '{bin}': {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("query engine exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("query engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Contract shared by all query engine backends.
pub trait QueryEngine: Send + Sync {
    /// Backend identifier ("native", "cli").
    fn name(&self) -> &'static str;

    /// Whether a grammar is available for the language.
    fn supports(&self, language: Language) -> bool;

    /// Run the language's query over a batch of files.
    ///
    /// The returned vector is aligned with `files`: entry `i` holds the
    /// matches for `files[i]`.
    fn run(&self, language: Language, files: &[SourceFile]) -> Result<Vec<Vec<Match>>, EngineError>;
}

/// Query definitions materialised as `<key>.scm` files.
///
/// The directory lives as long as the session and is removed on drop, or
/// explicitly through [`QuerySession::close`].
pub struct QuerySession {
    dir: TempDir,
    files: HashMap<QueryKey, PathBuf>,
}

impl QuerySession {
    /// Write every query definition into a fresh temporary directory.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("codefold-queries-")
            .tempdir()
            .context("Failed to create query directory")?;

        let mut files = HashMap::new();
        for key in QueryKey::ALL {
            let path = dir.path().join(format!("{}.scm", key.as_str()));
            std::fs::write(&path, key.source())
                .with_context(|| format!("Failed to write query file {:?}", path))?;
            files.insert(key, path);
        }

        Ok(Self { dir, files })
    }

    pub fn query_path(&self, key: QueryKey) -> Option<&Path> {
        self.files.get(&key).map(PathBuf::as_path)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the query directory, reporting any IO failure.
    pub fn close(self) -> Result<()> {
        self.dir.close().context("Failed to remove query directory")
    }
}

/// Build the engine selected by configuration.
pub fn from_config(config: &EngineConfig) -> Result<Box<dyn QueryEngine>> {
    let engine: Box<dyn QueryEngine> = match config.backend {
        EngineBackend::Native => Box::new(NativeEngine::new()),
        EngineBackend::Cli => Box::new(TreeSitterCli::new(
            config.tree_sitter_bin.clone(),
            config.grammar_root.clone(),
            Duration::from_secs(config.timeout_secs),
            QuerySession::create()?,
        )),
    };
    Ok(engine)
}
