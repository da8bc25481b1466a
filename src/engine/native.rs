//! In-process query engine backed by the linked tree-sitter grammars.
//!
//! Produces the same [`Match`]/[`Capture`] model as the CLI report, including
//! literal text for single-line captures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;
use tree_sitter::{Parser, Query, QueryCursor, StreamingIterator, Tree};

use super::capture::{Capture, Match};
use super::queries::QueryKey;
use super::{EngineError, QueryEngine, SourceFile};
use crate::language::Language;

/// Query engine that parses and queries files with tree-sitter directly.
///
/// Grammars are registered once; compiled queries are cached per language.
pub struct NativeEngine {
    /// Map of language to tree-sitter grammar
    grammars: HashMap<Language, tree_sitter::Language>,
    /// Compiled queries, built on first use
    queries: Mutex<HashMap<Language, Arc<Query>>>,
}

impl NativeEngine {
    /// Create an engine with every linked grammar registered.
    pub fn new() -> Self {
        let mut engine = Self {
            grammars: HashMap::new(),
            queries: Mutex::new(HashMap::new()),
        };

        engine.register(Language::Rust, tree_sitter_rust::LANGUAGE.into());
        engine.register(Language::Python, tree_sitter_python::LANGUAGE.into());
        engine.register(Language::JavaScript, tree_sitter_javascript::LANGUAGE.into());
        engine.register(Language::TypeScript, tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into());
        engine.register(Language::Tsx, tree_sitter_typescript::LANGUAGE_TSX.into());
        engine.register(Language::Go, tree_sitter_go::LANGUAGE.into());
        engine.register(Language::Java, tree_sitter_java::LANGUAGE.into());
        engine.register(Language::C, tree_sitter_c::LANGUAGE.into());
        engine.register(Language::Cpp, tree_sitter_cpp::LANGUAGE.into());

        engine
    }

    fn register(&mut self, language: Language, grammar: tree_sitter::Language) {
        self.grammars.insert(language, grammar);
    }

    /// Languages with a linked grammar.
    pub fn supported_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.grammars.keys().copied().collect();
        languages.sort_by_key(|l| l.as_str());
        languages
    }

    fn query(&self, language: Language, grammar: &tree_sitter::Language) -> Result<Arc<Query>, EngineError> {
        let mut cache = self
            .queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(query) = cache.get(&language) {
            return Ok(query.clone());
        }

        let key = QueryKey::for_language(language).ok_or(EngineError::MissingGrammar(language))?;
        let query = Query::new(grammar, key.source()).map_err(|e| EngineError::Query {
            language,
            reason: e.to_string(),
        })?;
        let query = Arc::new(query);
        cache.insert(language, query.clone());
        Ok(query)
    }
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports(&self, language: Language) -> bool {
        self.grammars.contains_key(&language)
    }

    fn run(&self, language: Language, files: &[SourceFile]) -> Result<Vec<Vec<Match>>, EngineError> {
        let grammar = self
            .grammars
            .get(&language)
            .ok_or(EngineError::MissingGrammar(language))?;
        let query = self.query(language, grammar)?;

        let mut parser = Parser::new();
        parser.set_language(grammar).map_err(|e| EngineError::Query {
            language,
            reason: e.to_string(),
        })?;

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let tree = parser
                .parse(file.content.as_bytes(), None)
                .ok_or(EngineError::Parse(language))?;
            let matches = collect_matches(&query, &tree, file.content.as_bytes());
            debug!("{}: {} query matches", file.relative_path, matches.len());
            results.push(matches);
        }

        Ok(results)
    }
}

fn collect_matches(query: &Query, tree: &Tree, source: &[u8]) -> Vec<Match> {
    let names = query.capture_names();
    let mut cursor = QueryCursor::new();
    let mut out = Vec::new();

    let mut matches = cursor.matches(query, tree.root_node(), source);
    while let Some(m) = matches.next() {
        let mut current = Match::new(m.pattern_index);
        for cap in m.captures {
            let node = cap.node;
            let start = node.start_position();
            let end = node.end_position();
            let text = if start.row == end.row {
                node.utf8_text(source).ok().map(str::to_string)
            } else {
                None
            };

            current.captures.push(Capture {
                tag: names[cap.index as usize].to_string(),
                start_row: start.row,
                start_col: start.column,
                end_row: end.row,
                end_col: end.column,
                text,
            });
        }
        out.push(current);
    }

    out
}
