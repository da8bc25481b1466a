use std::ops::RangeInclusive;

use crate::language::{Language, LanguageFamily};

/// Decide whether a symbol is part of the file's public surface.
///
/// `export_ranges` are the row spans of export statements; they only matter
/// for languages that mark exports with a wrapping statement.
pub fn is_exported(
    name: &str,
    start: usize,
    end: usize,
    export_ranges: &[RangeInclusive<usize>],
    lines: &[&str],
    language: Language,
) -> bool {
    match language.family() {
        LanguageFamily::ExportDelimited => export_ranges
            .iter()
            .any(|r| start >= *r.start() && end <= *r.end()),
        LanguageFamily::UnderscorePrivate => !name.starts_with('_'),
        LanguageFamily::IdentifierCase => name
            .chars()
            .next()
            .map(|c| c.is_uppercase() && c.to_lowercase().ne(std::iter::once(c)))
            .unwrap_or(false),
        LanguageFamily::VisibilityKeyword => lines
            .get(start)
            .map(|l| l.trim_start().starts_with("pub"))
            .unwrap_or(false),
        LanguageFamily::Open => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_ranges() {
        let ranges = vec![2..=4];
        assert!(is_exported("f", 2, 4, &ranges, &[], Language::TypeScript));
        assert!(is_exported("f", 3, 3, &ranges, &[], Language::Tsx));
        assert!(!is_exported("f", 1, 3, &ranges, &[], Language::JavaScript));
        assert!(!is_exported("f", 3, 5, &ranges, &[], Language::TypeScript));
    }

    #[test]
    fn test_underscore_convention() {
        assert!(is_exported("public", 0, 0, &[], &[], Language::Python));
        assert!(!is_exported("_private", 0, 0, &[], &[], Language::Python));
    }

    #[test]
    fn test_identifier_case() {
        assert!(is_exported("Handler", 0, 0, &[], &[], Language::Go));
        assert!(!is_exported("handler", 0, 0, &[], &[], Language::Go));
        assert!(!is_exported("_x", 0, 0, &[], &[], Language::Go));
        assert!(!is_exported("", 0, 0, &[], &[], Language::Go));
    }

    #[test]
    fn test_visibility_keyword() {
        let lines = ["    pub fn a() {}", "fn b() {}"];
        assert!(is_exported("a", 0, 0, &[], &lines, Language::Rust));
        assert!(!is_exported("b", 1, 1, &[], &lines, Language::Rust));
        assert!(!is_exported("c", 9, 9, &[], &lines, Language::Rust));
    }

    #[test]
    fn test_other_languages_are_open() {
        assert!(is_exported("anything", 0, 0, &[], &[], Language::Java));
        assert!(is_exported("_x", 0, 0, &[], &[], Language::Ruby));
    }
}
