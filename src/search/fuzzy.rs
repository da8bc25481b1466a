//! Query normalisation and per-part fuzzy scoring.

const EXACT_SCORE: usize = 10;
const SUBSTRING_SCORE: usize = 5;
const SUBSEQUENCE_SCORE: usize = 1;

/// A lowercased query together with its split parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerms {
    /// Whole query, lowercased
    pub raw: String,
    /// Parts split on whitespace, `_`, `-`, `.` and `/`
    pub parts: Vec<String>,
}

impl QueryTerms {
    pub fn new(query: &str) -> Self {
        let raw = query.to_lowercase();
        let parts = raw
            .split(|c: char| c.is_whitespace() || matches!(c, '_' | '-' | '.' | '/'))
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self { raw, parts }
    }

    /// Score `text` (already lowercased) against every part.
    pub fn score(&self, text: &str) -> usize {
        match_score(text, &self.parts)
    }
}

/// Sum of per-part scores: exact 10, substring 5, in-order subsequence 1.
pub fn match_score<S: AsRef<str>>(text: &str, parts: &[S]) -> usize {
    parts
        .iter()
        .map(|part| {
            let part = part.as_ref();
            if text == part {
                EXACT_SCORE
            } else if text.contains(part) {
                SUBSTRING_SCORE
            } else if is_subsequence(part, text) {
                SUBSEQUENCE_SCORE
            } else {
                0
            }
        })
        .sum()
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}
