//! Language detection from file extensions.
//!
//! Detection is a pure extension lookup; anything unmapped becomes
//! [`Language::Unknown`], which indexes to an empty outline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Languages recognised by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Go,
    Rust,
    Ruby,
    Java,
    C,
    Cpp,
    Unknown,
}

/// How a language marks a symbol as part of its public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    /// Exports are syntactically delimited (`export ...` statements).
    ExportDelimited,
    /// Leading underscore means private.
    UnderscorePrivate,
    /// Uppercase first letter means exported.
    IdentifierCase,
    /// A visibility keyword starts the declaration.
    VisibilityKeyword,
    /// No convention; everything is visible.
    Open,
}

impl Language {
    /// All languages with a grammar mapping, in a stable order.
    pub const KNOWN: [Language; 10] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Tsx,
        Language::Python,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Java,
        Language::C,
        Language::Cpp,
    ];

    /// Map a bare extension (without the dot) to a language.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "py" | "pyw" => Language::Python,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "rb" => Language::Ruby,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Language::Cpp,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Unknown => "unknown",
        }
    }

    pub fn family(&self) -> LanguageFamily {
        match self {
            Language::JavaScript | Language::TypeScript | Language::Tsx => {
                LanguageFamily::ExportDelimited
            }
            Language::Python => LanguageFamily::UnderscorePrivate,
            Language::Go => LanguageFamily::IdentifierCase,
            Language::Rust => LanguageFamily::VisibilityKeyword,
            _ => LanguageFamily::Open,
        }
    }

    /// Whether docstrings below the definition line count as documentation.
    pub fn has_docstrings(&self) -> bool {
        matches!(self, Language::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the language of a file from its extension.
pub fn detect_language(path: impl AsRef<Path>) -> Language {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(Language::from_extension)
        .unwrap_or(Language::Unknown)
}
