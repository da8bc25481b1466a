//! Indexing session: walks a tree, runs the query engine per language batch
//! and builds a [`FileIndex`] for every file.

pub mod diagnostics;
pub mod reader;
pub mod walker;

use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::{Config, IndexerConfig};
use crate::engine::{self, Match, QueryEngine, QueryKey, SourceFile};
use crate::language::{detect_language, Language};
use crate::metrics::{DEGRADED_FILES, ENGINE_INVOCATIONS, FILES_INDEXED};
use crate::render::{estimate_tokens, format_folded_view};
use crate::symbol::{build_symbols, FileIndex};

pub use diagnostics::{DegradeReason, DegradedFile, Diagnostics};
pub use reader::{read_guarded, read_sources, relative_path};
pub use walker::Walker;

/// Token estimate reported for files that could not be outlined.
pub const FALLBACK_TOKEN_ESTIMATE: usize = 50;

/// Outlines produced by one batch, plus the files that degraded.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Keyed by relative path, grouped by language in first-seen order
    pub files: IndexMap<String, FileIndex>,
    pub degraded: Vec<DegradedFile>,
}

/// Owns a query engine and turns source files into outlines.
pub struct Indexer {
    engine: Box<dyn QueryEngine>,
    config: IndexerConfig,
    diagnostics: Diagnostics,
}

impl Indexer {
    /// Create an indexer around an engine, using default walk settings.
    pub fn new(engine: Box<dyn QueryEngine>) -> Self {
        Self {
            engine,
            config: IndexerConfig::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_config(mut self, config: IndexerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine and walk settings from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = engine::from_config(&config.engine)?;
        debug!("Using {} query engine", engine.name());
        Ok(Self::new(engine).with_config(config.indexer.clone()))
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Degraded files recorded over the lifetime of this indexer.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Walk `root` and read every candidate file that passes the guards.
    pub fn collect_sources(&self, root: &Path, file_pattern: Option<&str>) -> Vec<SourceFile> {
        let paths = Walker::new(root, &self.config).collect_files();
        debug!("Walked {} candidate files under {}", paths.len(), root.display());
        read_sources(root, paths, file_pattern, self.config.max_file_size_bytes)
    }

    /// Outline a single file.
    pub fn index_file(&self, content: &str, path: &str) -> FileIndex {
        let file = SourceFile::new(path, content);
        let language = detect_language(path);
        let mut degraded = Vec::new();

        let mut outlines = self.index_group(language, std::slice::from_ref(&file), &mut degraded);
        self.record([path], &degraded);

        outlines
            .pop()
            .unwrap_or_else(|| degraded_index(path, content, language))
    }

    /// Outline a batch, invoking the engine once per language.
    pub fn index_batch(&self, files: &[SourceFile]) -> IndexMap<String, FileIndex> {
        self.index_batch_report(files).files
    }

    /// Like [`Indexer::index_batch`], also returning this batch's degraded files.
    pub fn index_batch_report(&self, files: &[SourceFile]) -> BatchReport {
        let mut groups: IndexMap<Language, Vec<SourceFile>> = IndexMap::new();
        for file in files {
            groups
                .entry(detect_language(&file.relative_path))
                .or_default()
                .push(file.clone());
        }

        let mut report = BatchReport::default();
        for (language, group) in groups {
            let outlines = self.index_group(language, &group, &mut report.degraded);
            for outline in outlines {
                report.files.insert(outline.file_path.clone(), outline);
            }
        }

        self.record(files.iter().map(|f| f.relative_path.as_str()), &report.degraded);
        report
    }

    fn index_group(
        &self,
        language: Language,
        files: &[SourceFile],
        degraded: &mut Vec<DegradedFile>,
    ) -> Vec<FileIndex> {
        if QueryKey::for_language(language).is_none() || !self.engine.supports(language) {
            debug!("No grammar for {}, {} file(s) degraded", language, files.len());
            return files
                .iter()
                .map(|file| {
                    degraded.push(DegradedFile {
                        path: file.relative_path.clone(),
                        language,
                        reason: DegradeReason::UnsupportedLanguage,
                    });
                    degraded_index(&file.relative_path, &file.content, language)
                })
                .collect();
        }

        ENGINE_INVOCATIONS.inc();
        let mut results = match self.engine.run(language, files) {
            Ok(results) => results,
            Err(e) => {
                warn!(
                    "{} engine failed for {} {} file(s): {}",
                    self.engine.name(),
                    files.len(),
                    language,
                    e
                );
                degraded.extend(files.iter().map(|file| DegradedFile {
                    path: file.relative_path.clone(),
                    language,
                    reason: DegradeReason::EngineFailure(e.to_string()),
                }));
                Vec::new()
            }
        };
        results.resize_with(files.len(), Vec::new);

        files
            .iter()
            .zip(results)
            .map(|(file, matches)| build_file_index(&file.relative_path, &file.content, language, &matches))
            .collect()
    }

    /// Refresh diagnostics for the indexed paths: previous entries are
    /// dropped, then this pass's degraded files are recorded.
    fn record<'a>(&self, paths: impl IntoIterator<Item = &'a str>, degraded: &[DegradedFile]) {
        let mut indexed = 0usize;
        for path in paths {
            self.diagnostics.resolve(path);
            indexed += 1;
        }
        FILES_INDEXED.inc_by(indexed as f64);
        for file in degraded {
            DEGRADED_FILES.inc();
            self.diagnostics.record(file.clone());
        }
    }
}

/// Assemble the outline of one file from its engine matches.
pub fn build_file_index(path: &str, content: &str, language: Language, matches: &[Match]) -> FileIndex {
    let lines: Vec<&str> = content.split('\n').collect();
    let built = build_symbols(matches, &lines, language);

    let mut file = FileIndex {
        file_path: path.to_string(),
        language,
        symbols: built.symbols,
        imports: built.imports,
        total_lines: lines.len(),
        folded_token_estimate: 0,
    };
    file.folded_token_estimate = estimate_tokens(&format_folded_view(&file));
    file
}

fn degraded_index(path: &str, content: &str, language: Language) -> FileIndex {
    FileIndex {
        file_path: path.to_string(),
        language,
        symbols: Vec::new(),
        imports: Vec::new(),
        total_lines: content.split('\n').count(),
        folded_token_estimate: FALLBACK_TOKEN_ESTIMATE,
    }
}
