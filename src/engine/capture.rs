//! Normalisation of the query engine's textual report.
//!
//! The report groups matches per file:
//!
//! ```text
//! /path/to/file.ts
//!   pattern: 0
//!     capture: 1 - name, start: (0, 16), end: (0, 21), text: `alpha`
//!     capture: func, start: (0, 7), end: (0, 38)
//! ```
//!
//! Anything that does not fit this shape is dropped without error.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref PATTERN_LINE: Regex = Regex::new(r"^\s+pattern:\s+(\d+)").unwrap();
    static ref CAPTURE_LINE: Regex = Regex::new(
        r"^\s+capture:\s+(?:\d+\s*-\s*)?(\w+),\s*start:\s*\((\d+),\s*(\d+)\),\s*end:\s*\((\d+),\s*(\d+)\)(?:,\s*text:\s*`([^`]*)`)?"
    )
    .unwrap();
}

/// A tagged source span reported by the engine (0-based rows and columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capture {
    pub tag: String,
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
    /// Literal text, when the engine supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One firing of one query pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Match {
    pub pattern: usize,
    pub captures: Vec<Capture>,
}

impl Match {
    pub fn new(pattern: usize) -> Self {
        Self {
            pattern,
            captures: Vec::new(),
        }
    }

    /// First capture carrying the given tag.
    pub fn capture(&self, tag: &str) -> Option<&Capture> {
        self.captures.iter().find(|c| c.tag == tag)
    }
}

/// Matches per file, in the order files appeared in the report.
pub type FileMatches = IndexMap<String, Vec<Match>>;

/// Parse a multi-file query report into per-file matches.
pub fn parse_query_output(output: &str) -> FileMatches {
    let mut file_matches = FileMatches::new();
    let mut current_file: Option<String> = None;
    let mut has_match = false;

    for line in output.split('\n') {
        if !line.is_empty() && !line.starts_with(char::is_whitespace) {
            let file = line.trim().to_string();
            file_matches.entry(file.clone()).or_default();
            current_file = Some(file);
            has_match = false;
            continue;
        }

        let Some(file) = current_file.as_ref() else {
            continue;
        };
        let Some(matches) = file_matches.get_mut(file) else {
            continue;
        };

        if let Some(caps) = PATTERN_LINE.captures(line) {
            let Ok(pattern) = caps[1].parse::<usize>() else {
                continue;
            };
            matches.push(Match::new(pattern));
            has_match = true;
            continue;
        }

        if !has_match {
            continue;
        }

        if let Some(capture) = parse_capture_line(line) {
            if let Some(current) = matches.last_mut() {
                current.captures.push(capture);
            }
        }
    }

    file_matches
}

fn parse_capture_line(line: &str) -> Option<Capture> {
    let caps = CAPTURE_LINE.captures(line)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<usize>().ok());

    Some(Capture {
        tag: caps[1].to_string(),
        start_row: num(2)?,
        start_col: num(3)?,
        end_row: num(4)?,
        end_col: num(5)?,
        text: caps.get(6).map(|m| m.as_str().to_string()),
    })
}
