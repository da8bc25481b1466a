//! Tree-sitter query definitions, one per grammar family.
//!
//! Every definition tags the whole declaration with a kind capture (`@func`,
//! `@cls`, ...) and its identifier with `@name`. Imports are tagged `@imp`
//! and export statements `@exp`.

use crate::language::Language;

/// Identifies which query definition a language uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Jsts,
    JavaScript,
    Python,
    Go,
    Rust,
    Ruby,
    Java,
    C,
    Cpp,
}

impl QueryKey {
    pub const ALL: [QueryKey; 9] = [
        QueryKey::Jsts,
        QueryKey::JavaScript,
        QueryKey::Python,
        QueryKey::Go,
        QueryKey::Rust,
        QueryKey::Ruby,
        QueryKey::Java,
        QueryKey::C,
        QueryKey::Cpp,
    ];

    /// Query definition used for a language, if any.
    pub fn for_language(language: Language) -> Option<Self> {
        match language {
            Language::TypeScript | Language::Tsx => Some(QueryKey::Jsts),
            Language::JavaScript => Some(QueryKey::JavaScript),
            Language::Python => Some(QueryKey::Python),
            Language::Go => Some(QueryKey::Go),
            Language::Rust => Some(QueryKey::Rust),
            Language::Ruby => Some(QueryKey::Ruby),
            Language::Java => Some(QueryKey::Java),
            Language::C => Some(QueryKey::C),
            Language::Cpp => Some(QueryKey::Cpp),
            Language::Unknown => None,
        }
    }

    /// Stable identifier, also used as the query file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Jsts => "jsts",
            QueryKey::JavaScript => "javascript",
            QueryKey::Python => "python",
            QueryKey::Go => "go",
            QueryKey::Rust => "rust",
            QueryKey::Ruby => "ruby",
            QueryKey::Java => "java",
            QueryKey::C => "c",
            QueryKey::Cpp => "cpp",
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            QueryKey::Jsts => JSTS_QUERY,
            QueryKey::JavaScript => JAVASCRIPT_QUERY,
            QueryKey::Python => PYTHON_QUERY,
            QueryKey::Go => GO_QUERY,
            QueryKey::Rust => RUST_QUERY,
            QueryKey::Ruby => RUBY_QUERY,
            QueryKey::Java => JAVA_QUERY,
            QueryKey::C => C_QUERY,
            QueryKey::Cpp => CPP_QUERY,
        }
    }
}

const JSTS_QUERY: &str = r#"
(function_declaration name: (identifier) @name) @func
(lexical_declaration (variable_declarator name: (identifier) @name value: [(arrow_function) (function_expression)])) @const_func
(class_declaration name: (type_identifier) @name) @cls
(method_definition name: (property_identifier) @name) @method
(interface_declaration name: (type_identifier) @name) @iface
(type_alias_declaration name: (type_identifier) @name) @tdef
(enum_declaration name: (identifier) @name) @enm
(import_statement) @imp
(export_statement) @exp
"#;

const JAVASCRIPT_QUERY: &str = r#"
(function_declaration name: (identifier) @name) @func
(lexical_declaration (variable_declarator name: (identifier) @name value: [(arrow_function) (function_expression)])) @const_func
(class_declaration name: (identifier) @name) @cls
(method_definition name: (property_identifier) @name) @method
(import_statement) @imp
(export_statement) @exp
"#;

const PYTHON_QUERY: &str = r#"
(function_definition name: (identifier) @name) @func
(class_definition name: (identifier) @name) @cls
(import_statement) @imp
(import_from_statement) @imp
"#;

const GO_QUERY: &str = r#"
(function_declaration name: (identifier) @name) @func
(method_declaration name: (field_identifier) @name) @method
(type_declaration (type_spec name: (type_identifier) @name)) @tdef
(import_declaration) @imp
"#;

const RUST_QUERY: &str = r#"
(function_item name: (identifier) @name) @func
(struct_item name: (type_identifier) @name) @struct_def
(enum_item name: (type_identifier) @name) @enm
(trait_item name: (type_identifier) @name) @trait_def
(impl_item type: (type_identifier) @name) @impl_def
(use_declaration) @imp
"#;

const RUBY_QUERY: &str = r#"
(method name: (identifier) @name) @func
(class name: (constant) @name) @cls
(module name: (constant) @name) @cls
(call method: (identifier) @name) @imp
"#;

const JAVA_QUERY: &str = r#"
(method_declaration name: (identifier) @name) @method
(class_declaration name: (identifier) @name) @cls
(interface_declaration name: (identifier) @name) @iface
(enum_declaration name: (identifier) @name) @enm
(import_declaration) @imp
"#;

const C_QUERY: &str = r#"
(function_definition declarator: (function_declarator declarator: (identifier) @name)) @func
(struct_specifier name: (type_identifier) @name body: (field_declaration_list)) @struct_def
(enum_specifier name: (type_identifier) @name body: (enumerator_list)) @enm
(type_definition declarator: (type_identifier) @name) @tdef
(preproc_include) @imp
"#;

const CPP_QUERY: &str = r#"
(function_definition declarator: (function_declarator declarator: [(identifier) (field_identifier) (qualified_identifier)] @name)) @func
(class_specifier name: (type_identifier) @name body: (field_declaration_list)) @cls
(struct_specifier name: (type_identifier) @name body: (field_declaration_list)) @struct_def
(enum_specifier name: (type_identifier) @name body: (enumerator_list)) @enm
(type_definition declarator: (type_identifier) @name) @tdef
(preproc_include) @imp
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_language_has_a_query() {
        for language in Language::KNOWN {
            assert!(
                QueryKey::for_language(language).is_some(),
                "no query for {}",
                language
            );
        }
        assert!(QueryKey::for_language(Language::Unknown).is_none());
    }

    #[test]
    fn test_typescript_variants_share_a_query() {
        assert_eq!(QueryKey::for_language(Language::TypeScript), Some(QueryKey::Jsts));
        assert_eq!(QueryKey::for_language(Language::Tsx), Some(QueryKey::Jsts));
    }

    #[test]
    fn test_every_query_tags_names() {
        for key in QueryKey::ALL {
            assert!(key.source().contains("@name"), "{} lacks @name", key.as_str());
            assert!(key.source().contains("@imp"), "{} lacks @imp", key.as_str());
        }
    }
}
