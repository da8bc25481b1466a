//! Line-based extraction of signatures and documentation.

use crate::language::Language;

/// Lines scanned below a definition when its first line does not open a body.
const SIGNATURE_LOOKAHEAD_LINES: usize = 10;
/// An opening brace further than this into the lookahead chunk is ignored.
const SIGNATURE_BRACE_WINDOW: usize = 500;
const SIGNATURE_MAX_CHARS: usize = 200;
/// Rows below a Python definition searched for a docstring.
const DOCSTRING_LOOKAHEAD: usize = 3;

const COMMENT_MARKERS: [&str; 8] = ["/**", "*", "*/", "//", "///", "//!", "#", "@"];

/// Extracts human-readable context for a symbol from the raw source lines.
pub trait HeuristicExtractor: Send + Sync {
    /// One-line signature for the definition spanning `start..=end`.
    fn signature(&self, lines: &[&str], start: usize, end: usize) -> String;

    /// Leading comment block or docstring.
    fn documentation(&self, lines: &[&str], start: usize, end: usize) -> Option<String>;
}

/// Heuristics that only look at line text, never at the syntax tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineHeuristics {
    /// Fall back to a docstring below the definition
    pub docstrings: bool,
}

static BRACED: LineHeuristics = LineHeuristics { docstrings: false };
static DOCSTRING: LineHeuristics = LineHeuristics { docstrings: true };

/// Select the extractor for a language.
pub fn heuristics_for(language: Language) -> &'static dyn HeuristicExtractor {
    if language.has_docstrings() {
        &DOCSTRING
    } else {
        &BRACED
    }
}

impl HeuristicExtractor for LineHeuristics {
    fn signature(&self, lines: &[&str], start: usize, end: usize) -> String {
        extract_signature(lines, start, end)
    }

    fn documentation(&self, lines: &[&str], start: usize, end: usize) -> Option<String> {
        comment_above(lines, start).or_else(|| {
            if self.docstrings {
                docstring_below(lines, start, end)
            } else {
                None
            }
        })
    }
}

/// Whether a trimmed line reads as part of a comment block.
pub fn is_comment_marker(trimmed: &str) -> bool {
    COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m))
}

fn line<'a>(lines: &[&'a str], row: usize) -> &'a str {
    lines.get(row).copied().unwrap_or("")
}

pub fn extract_signature(lines: &[&str], start: usize, end: usize) -> String {
    let first = line(lines, start);
    let mut sig = first.to_string();

    let head = first.trim_end();
    if !head.ends_with('{') && !head.ends_with(':') {
        let stop = (start + SIGNATURE_LOOKAHEAD_LINES).min(end + 1).min(lines.len());
        let chunk = if start < stop {
            lines[start..stop].join("\n")
        } else {
            String::new()
        };

        if let Some(brace) = chunk.find('{') {
            if brace < SIGNATURE_BRACE_WINDOW {
                sig = chunk[..brace].split_whitespace().collect::<Vec<_>>().join(" ");
            }
        }
    }

    let trimmed = sig.trim_end();
    let trimmed = trimmed
        .strip_suffix(['{', ':'])
        .map(str::trim_end)
        .unwrap_or(trimmed)
        .trim();

    truncate(trimmed, SIGNATURE_MAX_CHARS)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}

fn comment_above(lines: &[&str], start: usize) -> Option<String> {
    let mut collected = Vec::new();
    let mut found = false;

    for row in (0..start.min(lines.len())).rev() {
        let trimmed = lines[row].trim();
        if trimmed.is_empty() {
            if found {
                break;
            }
            continue;
        }

        if is_comment_marker(trimmed) {
            collected.push(lines[row]);
            found = true;
        } else {
            break;
        }
    }

    if collected.is_empty() {
        return None;
    }
    collected.reverse();
    Some(collected.join("\n").trim().to_string())
}

fn docstring_below(lines: &[&str], start: usize, end: usize) -> Option<String> {
    let last = (start + DOCSTRING_LOOKAHEAD).min(end);
    for row in start + 1..=last {
        let trimmed = line(lines, row).trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("\"\"\"") || trimmed.starts_with("'''") {
            return Some(trimmed.to_string());
        }
        break;
    }
    None
}
