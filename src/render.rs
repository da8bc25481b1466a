//! Text rendering of folded file views and search reports.
//!
//! Rendering is pure: the same input always produces byte-identical output.

use crate::search::SearchResult;
use crate::symbol::{FileIndex, Symbol};

/// Maximum imports listed before collapsing the rest into a count.
const MAX_LISTED_IMPORTS: usize = 10;

/// Rough token count: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Render the outline of one file.
pub fn format_folded_view(file: &FileIndex) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "📁 {} ({}, {} lines)",
        file.file_path, file.language, file.total_lines
    ));
    parts.push(String::new());

    if !file.imports.is_empty() {
        parts.push(format!("  📦 Imports: {} statements", file.imports.len()));
        for import in file.imports.iter().take(MAX_LISTED_IMPORTS) {
            parts.push(format!("    {}", import));
        }
        if file.imports.len() > MAX_LISTED_IMPORTS {
            parts.push(format!(
                "    ... +{} more",
                file.imports.len() - MAX_LISTED_IMPORTS
            ));
        }
        parts.push(String::new());
    }

    for symbol in &file.symbols {
        parts.push(format_symbol(symbol, "  "));
    }

    parts.join("\n")
}

fn format_symbol(symbol: &Symbol, indent: &str) -> String {
    let mut parts = Vec::new();

    let export_tag = if symbol.exported { " [exported]" } else { "" };
    parts.push(format!(
        "{}{} {}{} ({})",
        indent,
        symbol.kind.icon(),
        symbol.name,
        export_tag,
        line_range(symbol)
    ));
    parts.push(format!("{}  {}", indent, symbol.signature));

    if let Some(doc) = symbol.documentation.as_deref().and_then(folded_doc_line) {
        parts.push(format!("{}  💬 {}", indent, doc));
    }

    let child_indent = format!("{}  ", indent);
    for child in &symbol.children {
        parts.push(format_symbol(child, &child_indent));
    }

    parts.join("\n")
}

fn line_range(symbol: &Symbol) -> String {
    if symbol.line_start == symbol.line_end {
        format!("L{}", symbol.line_start + 1)
    } else {
        format!("L{}-{}", symbol.line_start + 1, symbol.line_end + 1)
    }
}

fn strip_comment_prefix(line: &str) -> &str {
    line.trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == '/')
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

fn strip_triple_quote_prefix(text: &str) -> &str {
    let mut chars = text.char_indices();
    for _ in 0..3 {
        match chars.next() {
            Some((_, c)) if is_quote(c) => {}
            _ => return text,
        }
    }
    &text[3..]
}

fn strip_triple_quote_suffix(text: &str) -> &str {
    let mut chars = text.char_indices().rev();
    let mut cut = text.len();
    for _ in 0..3 {
        match chars.next() {
            Some((i, c)) if is_quote(c) => cut = i,
            _ => return text,
        }
    }
    &text[..cut]
}

/// First meaningful documentation line, stripped of comment and quote markers.
fn folded_doc_line(doc: &str) -> Option<String> {
    let line = doc.split('\n').find(|l| {
        let t = strip_triple_quote_prefix(strip_comment_prefix(l)).trim();
        !t.is_empty() && !t.starts_with("/**")
    })?;

    let cleaned = strip_triple_quote_suffix(strip_triple_quote_prefix(strip_comment_prefix(line))).trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

fn report_doc_line(doc: &str) -> Option<&str> {
    doc.split('\n')
        .map(|l| strip_comment_prefix(l).trim())
        .find(|l| !l.is_empty())
}

/// Render a search result as the report returned to tool callers.
pub fn format_search_results(result: &SearchResult, query: &str) -> String {
    let mut parts = Vec::new();

    parts.push(format!("🔍 Smart Search: \"{}\"", query));
    parts.push(format!(
        "   Scanned {} files, found {} symbols",
        result.total_files_scanned, result.total_symbols_found
    ));
    parts.push(format!(
        "   {} matches across {} files (~{} tokens for folded view)",
        result.matching_symbols.len(),
        result.folded_files.len(),
        result.token_estimate
    ));
    parts.push(String::new());

    if result.matching_symbols.is_empty() {
        parts.push("   No matching symbols found.".to_string());
        return parts.join("\n");
    }

    parts.push("── Matching Symbols ──".to_string());
    parts.push(String::new());

    for m in &result.matching_symbols {
        parts.push(format!(
            "  {} {} ({}:{})",
            m.kind,
            m.symbol_name,
            m.file_path,
            m.line_start + 1
        ));
        parts.push(format!("    {}", m.signature));
        if let Some(doc) = m.documentation.as_deref().and_then(report_doc_line) {
            parts.push(format!("    💬 {}", doc));
        }
        parts.push(String::new());
    }

    parts.push("── Folded File Views ──".to_string());
    parts.push(String::new());
    for file in &result.folded_files {
        parts.push(format_folded_view(file));
        parts.push(String::new());
    }

    parts.push("── Actions ──".to_string());
    parts.push(
        "  To see full implementation: use smart_unfold with file path and symbol name".to_string(),
    );

    parts.join("\n")
}
