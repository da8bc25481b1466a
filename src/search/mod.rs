//! Fuzzy symbol search across a directory tree.
//!
//! A search walks the tree, indexes every readable source file in language
//! batches, scores file paths and symbols against the query and returns the
//! top-ranked symbols together with the folded views of their files.

pub mod fuzzy;

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::indexer::{DegradedFile, Indexer};
use crate::metrics::{SEARCH_LATENCY, SEARCH_REQUESTS};
use crate::symbol::{FileIndex, Symbol, SymbolKind};

pub use fuzzy::{match_score, QueryTerms};

/// Number of symbols returned when the caller does not ask for a limit.
pub const DEFAULT_MAX_RESULTS: usize = 20;

const SIGNATURE_WEIGHT: usize = 2;
const DOCUMENTATION_WEIGHT: usize = 1;
const NAME_MULTIPLIER: usize = 3;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Cap on returned symbols and folded files; 0 means the default
    pub max_results: usize,
    /// Case-insensitive substring filter on relative paths
    pub file_pattern: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            file_pattern: None,
        }
    }
}

impl SearchOptions {
    fn limit(&self) -> usize {
        if self.max_results == 0 {
            DEFAULT_MAX_RESULTS
        } else {
            self.max_results
        }
    }
}

/// A symbol that matched the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSymbolMatch {
    pub file_path: String,
    /// `Parent.child` for nested symbols
    pub symbol_name: String,
    pub kind: SymbolKind,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub line_start: usize,
    pub line_end: usize,
    pub match_reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    pub folded_files: Vec<FileIndex>,
    pub matching_symbols: Vec<RankedSymbolMatch>,
    pub total_files_scanned: usize,
    pub total_symbols_found: usize,
    pub token_estimate: usize,
    /// Files indexed without symbols during this search
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded_files: Vec<DegradedFile>,
}

/// Search every indexable file under `root` for symbols matching `query`.
pub fn search_codebase(
    indexer: &Indexer,
    root: &Path,
    query: &str,
    options: &SearchOptions,
) -> SearchResult {
    let started = Instant::now();
    SEARCH_REQUESTS.inc();

    let terms = QueryTerms::new(query);
    let sources = indexer.collect_sources(root, options.file_pattern.as_deref());
    let batch = indexer.index_batch_report(&sources);

    let mut total_symbols_found = 0;
    let mut matched_files = Vec::new();
    let mut matching_symbols = Vec::new();

    for (path, file) in batch.files {
        total_symbols_found += file.symbol_count();

        let mut file_matches = Vec::new();
        collect_matches(&file.symbols, None, &path, &terms, &mut file_matches);

        if terms.score(&path.to_lowercase()) > 0 || !file_matches.is_empty() {
            matching_symbols.extend(file_matches);
            matched_files.push(file);
        }
    }

    let mut ranked: Vec<(usize, RankedSymbolMatch)> = matching_symbols
        .into_iter()
        .map(|m| (terms.score(&m.symbol_name.to_lowercase()), m))
        .collect();
    ranked.sort_by_key(|(score, _)| Reverse(*score));

    let limit = options.limit();
    let matching_symbols: Vec<RankedSymbolMatch> =
        ranked.into_iter().take(limit).map(|(_, m)| m).collect();

    let referenced: HashSet<&str> = matching_symbols.iter().map(|m| m.file_path.as_str()).collect();
    let folded_files: Vec<FileIndex> = matched_files
        .into_iter()
        .filter(|f| referenced.contains(f.file_path.as_str()))
        .take(limit)
        .collect();

    let token_estimate = folded_files.iter().map(|f| f.folded_token_estimate).sum();

    let elapsed = started.elapsed();
    SEARCH_LATENCY.observe(elapsed.as_secs_f64());
    info!(
        "Search '{}' scanned {} files, {} matches in {:?}",
        query,
        sources.len(),
        matching_symbols.len(),
        elapsed
    );

    SearchResult {
        folded_files,
        matching_symbols,
        total_files_scanned: sources.len(),
        total_symbols_found,
        token_estimate,
        degraded_files: batch.degraded,
    }
}

/// Score symbols depth-first, parents before their children.
fn collect_matches(
    symbols: &[Symbol],
    parent: Option<&str>,
    file_path: &str,
    terms: &QueryTerms,
    out: &mut Vec<RankedSymbolMatch>,
) {
    for symbol in symbols {
        if let Some((score, reason)) = score_symbol(symbol, terms) {
            debug!("{}: {} scored {} ({})", file_path, symbol.name, score, reason);
            out.push(RankedSymbolMatch {
                file_path: file_path.to_string(),
                symbol_name: match parent {
                    Some(parent) => format!("{}.{}", parent, symbol.name),
                    None => symbol.name.clone(),
                },
                kind: symbol.kind,
                signature: symbol.signature.clone(),
                documentation: symbol.documentation.clone(),
                line_start: symbol.line_start,
                line_end: symbol.line_end,
                match_reason: reason,
            });
        }

        collect_matches(&symbol.children, Some(&symbol.name), file_path, terms, out);
    }
}

fn score_symbol(symbol: &Symbol, terms: &QueryTerms) -> Option<(usize, String)> {
    let mut score = 0;
    let mut reasons: Vec<&str> = Vec::new();

    let name_score = terms.score(&symbol.name.to_lowercase());
    if name_score > 0 {
        score += name_score * NAME_MULTIPLIER;
        reasons.push("name");
    }

    if symbol.signature.to_lowercase().contains(&terms.raw) {
        score += SIGNATURE_WEIGHT;
        reasons.push("signature");
    }

    if symbol
        .documentation
        .as_deref()
        .is_some_and(|doc| doc.to_lowercase().contains(&terms.raw))
    {
        score += DOCUMENTATION_WEIGHT;
        reasons.push("jsdoc");
    }

    (score > 0).then(|| (score, match_reason(&reasons)))
}

/// `"name match"`, `"name match + signature"`, `"signature match + jsdoc"`, ...
fn match_reason(reasons: &[&str]) -> String {
    match reasons.split_first() {
        Some((first, rest)) => {
            let mut reason = format!("{} match", first);
            for r in rest {
                reason.push_str(" + ");
                reason.push_str(r);
            }
            reason
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(q: &str) -> QueryTerms {
        QueryTerms::new(q)
    }

    #[test]
    fn test_match_reason_format() {
        assert_eq!(match_reason(&["name"]), "name match");
        assert_eq!(match_reason(&["name", "signature", "jsdoc"]), "name match + signature + jsdoc");
        assert_eq!(match_reason(&["signature", "jsdoc"]), "signature match + jsdoc");
        assert_eq!(match_reason(&["jsdoc"]), "jsdoc match");
    }

    #[test]
    fn test_score_symbol_weights() {
        let sym = Symbol::new("alpha", SymbolKind::Function, "function alpha()", 0, 0)
            .with_documentation("// alpha helper");
        let (score, reason) = score_symbol(&sym, &terms("alpha")).unwrap();
        assert_eq!(score, 10 * 3 + 2 + 1);
        assert_eq!(reason, "name match + signature + jsdoc");
    }

    #[test]
    fn test_signature_only_match() {
        let sym = Symbol::new("handler", SymbolKind::Function, "fn handler(req: Request)", 0, 0);
        let (score, reason) = score_symbol(&sym, &terms("req: request")).unwrap();
        assert_eq!(score, 2);
        assert_eq!(reason, "signature match");
        assert!(score_symbol(&sym, &terms("zzz")).is_none());
    }

    #[test]
    fn test_children_get_dotted_names() {
        let symbols = vec![Symbol::new("Example", SymbolKind::Class, "class Example", 0, 9)
            .with_children(vec![Symbol::new("run", SymbolKind::Method, "run()", 1, 2)])];
        let mut out = Vec::new();
        collect_matches(&symbols, None, "ex.ts", &terms("run"), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol_name, "Example.run");
        assert_eq!(out[0].match_reason, "name match + signature");
    }

    #[test]
    fn test_zero_limit_means_default() {
        let options = SearchOptions {
            max_results: 0,
            file_pattern: None,
        };
        assert_eq!(options.limit(), DEFAULT_MAX_RESULTS);
    }
}
