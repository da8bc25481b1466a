//! Symbol outlines built from query matches.
//!
//! This module turns the positional matches of a query engine into a nested
//! forest of [`Symbol`]s per file, and resolves symbols back to their source
//! text for unfolding.

pub mod builder;
pub mod heuristics;
pub mod resolve;
pub mod visibility;

use serde::Serialize;

use crate::language::Language;

pub use builder::{build_symbols, BuiltSymbols};
pub use heuristics::{HeuristicExtractor, LineHeuristics};
pub use resolve::{find_symbol, unfold_symbol};

/// Kinds of structural units an outline can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Interface,
    Type,
    Enum,
    Struct,
    Trait,
    Impl,
}

impl SymbolKind {
    /// Map a query capture tag to the kind it defines.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "func" | "const_func" => Some(SymbolKind::Function),
            "cls" => Some(SymbolKind::Class),
            "method" => Some(SymbolKind::Method),
            "iface" => Some(SymbolKind::Interface),
            "tdef" => Some(SymbolKind::Type),
            "enm" => Some(SymbolKind::Enum),
            "struct_def" => Some(SymbolKind::Struct),
            "trait_def" => Some(SymbolKind::Trait),
            "impl_def" => Some(SymbolKind::Impl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Type => "type",
            SymbolKind::Enum => "enum",
            SymbolKind::Struct => "struct",
            SymbolKind::Trait => "trait",
            SymbolKind::Impl => "impl",
        }
    }

    /// Containers may own nested symbols.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class | SymbolKind::Struct | SymbolKind::Impl | SymbolKind::Trait
        )
    }

    /// Glyph shown in folded views.
    pub fn icon(&self) -> &'static str {
        match self {
            SymbolKind::Function | SymbolKind::Method => "ƒ",
            SymbolKind::Class | SymbolKind::Struct => "◆",
            SymbolKind::Interface | SymbolKind::Type | SymbolKind::Trait => "◇",
            SymbolKind::Enum => "▣",
            SymbolKind::Impl => "◈",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named structural unit with its folded signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub signature: String,
    /// Leading comment block or docstring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Start line (0-indexed)
    pub line_start: usize,
    /// End line (0-indexed, inclusive)
    pub line_end: usize,
    pub exported: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Symbol>,
}

impl Symbol {
    /// Create a childless symbol without documentation.
    pub fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        signature: impl Into<String>,
        line_start: usize,
        line_end: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            signature: signature.into(),
            documentation: None,
            line_start,
            line_end,
            exported: false,
            children: Vec::new(),
        }
    }

    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    pub fn with_children(mut self, children: Vec<Symbol>) -> Self {
        self.children = children;
        self
    }

    /// Whether `other` lies strictly inside this symbol's line span.
    pub fn strictly_contains(&self, other: &Symbol) -> bool {
        other.line_start > self.line_start && other.line_end <= self.line_end
    }
}

/// Structural outline of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileIndex {
    pub file_path: String,
    pub language: Language,
    /// Top-level symbols
    pub symbols: Vec<Symbol>,
    pub imports: Vec<String>,
    pub total_lines: usize,
    /// Approximate token cost of the folded view
    pub folded_token_estimate: usize,
}

impl FileIndex {
    /// Number of top-level symbols plus their direct children.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len() + self.symbols.iter().map(|s| s.children.len()).sum::<usize>()
    }
}
