//! Builds the symbol forest of a file from engine matches.

use std::ops::RangeInclusive;

use super::heuristics::heuristics_for;
use super::visibility::is_exported;
use super::{Symbol, SymbolKind};
use crate::engine::Match;
use crate::language::Language;

const ANONYMOUS: &str = "anonymous";

/// Output of [`build_symbols`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltSymbols {
    /// Top-level symbols, containers carrying their nested members
    pub symbols: Vec<Symbol>,
    /// Import statements in encounter order
    pub imports: Vec<String>,
}

/// Turn the query matches of one file into symbols and imports.
///
/// `lines` is the file content split on `\n`.
pub fn build_symbols(matches: &[Match], lines: &[&str], language: Language) -> BuiltSymbols {
    let mut export_ranges: Vec<RangeInclusive<usize>> = Vec::new();
    let mut imports = Vec::new();

    for m in matches {
        for cap in &m.captures {
            match cap.tag.as_str() {
                "exp" => export_ranges.push(cap.start_row..=cap.end_row),
                "imp" => imports.push(import_text(cap.text.as_deref(), lines, cap.start_row)),
                _ => {}
            }
        }
    }

    let heuristics = heuristics_for(language);
    let mut flat = Vec::new();

    for m in matches {
        let Some((kind, span)) = m
            .captures
            .iter()
            .find_map(|c| SymbolKind::from_tag(&c.tag).map(|k| (k, c)))
        else {
            continue;
        };

        let name = m
            .capture("name")
            .and_then(|c| c.text.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(ANONYMOUS);
        let (start, end) = (span.start_row, span.end_row);

        let mut symbol = Symbol::new(name, kind, heuristics.signature(lines, start, end), start, end)
            .exported(is_exported(name, start, end, &export_ranges, lines, language));
        symbol.documentation = heuristics.documentation(lines, start, end);

        flat.push(symbol);
    }

    BuiltSymbols {
        symbols: nest(flat),
        imports,
    }
}

fn import_text(text: Option<&str>, lines: &[&str], row: usize) -> String {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        return text.to_string();
    }
    lines.get(row).map(|l| l.trim().to_string()).unwrap_or_default()
}

/// Apply one level of container ownership.
///
/// Owners are containers not strictly inside another container. Every other
/// symbol strictly inside an owner moves under the first such owner; a
/// function moved this way becomes a method.
fn nest(flat: Vec<Symbol>) -> Vec<Symbol> {
    let is_owner: Vec<bool> = flat
        .iter()
        .enumerate()
        .map(|(i, sym)| {
            sym.kind.is_container()
                && !flat
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && other.kind.is_container() && other.strictly_contains(sym))
        })
        .collect();

    let owner_of: Vec<Option<usize>> = flat
        .iter()
        .enumerate()
        .map(|(i, sym)| {
            if is_owner[i] {
                return None;
            }
            (0..flat.len()).find(|&o| is_owner[o] && flat[o].strictly_contains(sym))
        })
        .collect();

    let mut children: Vec<Vec<Symbol>> = vec![Vec::new(); flat.len()];
    let mut top_level = Vec::new();

    for (i, mut sym) in flat.into_iter().enumerate() {
        match owner_of[i] {
            Some(owner) => {
                if sym.kind == SymbolKind::Function {
                    sym.kind = SymbolKind::Method;
                }
                children[owner].push(sym);
            }
            None => top_level.push((i, sym)),
        }
    }

    top_level
        .into_iter()
        .map(|(i, mut sym)| {
            sym.children = std::mem::take(&mut children[i]);
            sym
        })
        .collect()
}
