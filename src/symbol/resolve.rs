use super::heuristics::is_comment_marker;
use super::{FileIndex, Symbol};
use crate::indexer::Indexer;

/// Find a symbol by exact name, falling back to a dotted path (`Class.method`).
///
/// Name lookup is depth-first, each symbol checked before its children.
pub fn find_symbol<'a>(symbols: &'a [Symbol], id: &str) -> Option<&'a Symbol> {
    find_by_name(symbols, id).or_else(|| {
        if !id.contains('.') {
            return None;
        }
        let segments: Vec<&str> = id.split('.').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            None
        } else {
            find_by_path(symbols, &segments)
        }
    })
}

fn find_by_name<'a>(symbols: &'a [Symbol], name: &str) -> Option<&'a Symbol> {
    symbols.iter().find_map(|sym| {
        if sym.name == name {
            Some(sym)
        } else {
            find_by_name(&sym.children, name)
        }
    })
}

fn find_by_path<'a>(symbols: &'a [Symbol], segments: &[&str]) -> Option<&'a Symbol> {
    let (head, rest) = segments.split_first()?;
    symbols
        .iter()
        .filter(|sym| sym.name == *head)
        .find_map(|sym| {
            if rest.is_empty() {
                Some(sym)
            } else {
                find_by_path(&sym.children, rest)
            }
        })
}

/// Full source of a symbol, with its leading comments and a location header.
///
/// Returns `None` when the file has no symbol matching `id`. The content is
/// indexed unless a `precomputed` outline is supplied.
pub fn unfold_symbol(
    indexer: &Indexer,
    content: &str,
    path: &str,
    id: &str,
    precomputed: Option<&FileIndex>,
) -> Option<String> {
    match precomputed {
        Some(file) => extract_source(content, path, find_symbol(&file.symbols, id)?),
        None => {
            let file = indexer.index_file(content, path);
            extract_source(content, path, find_symbol(&file.symbols, id)?)
        }
    }
}

fn extract_source(content: &str, path: &str, symbol: &Symbol) -> Option<String> {
    let lines: Vec<&str> = content.split('\n').collect();
    let end = symbol.line_end.min(lines.len().checked_sub(1)?);

    let mut start = symbol.line_start.min(end);
    while start > 0 {
        let trimmed = lines[start - 1].trim();
        if trimmed.is_empty() || trimmed == "*/" || is_comment_marker(trimmed) {
            start -= 1;
        } else {
            break;
        }
    }

    Some(format!(
        "// 📍 {} L{}-{}\n{}",
        path,
        start + 1,
        end + 1,
        lines[start..=end].join("\n")
    ))
}
