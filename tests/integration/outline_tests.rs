use anyhow::Result;

use codefold::engine::{NativeEngine, SourceFile};
use codefold::indexer::{DegradeReason, FALLBACK_TOKEN_ESTIMATE};
use codefold::render::{estimate_tokens, format_folded_view};
use codefold::symbol::{find_symbol, unfold_symbol};
use codefold::{Indexer, Language, SymbolKind};

fn native() -> Indexer {
    Indexer::new(Box::new(NativeEngine::new()))
}

#[test]
fn test_single_exported_function() {
    let file = native().index_file("export function alpha() { return 1; }", "alpha.ts");

    assert_eq!(file.language, Language::TypeScript);
    assert_eq!(file.symbols.len(), 1);

    let alpha = &file.symbols[0];
    assert_eq!(alpha.name, "alpha");
    assert_eq!(alpha.kind, SymbolKind::Function);
    assert!(alpha.exported);
    assert_eq!(alpha.signature, "export function alpha()");
    assert_eq!((alpha.line_start, alpha.line_end), (0, 0));
    assert_eq!(
        file.folded_token_estimate,
        estimate_tokens(&format_folded_view(&file))
    );
}

#[test]
fn test_typescript_class_and_imports() {
    let source = r#"import { readFile } from "fs";
import path from "path";

/** Loads settings from disk. */
export class Loader {
    load(name: string): string {
        return name;
    }
}

function helper() {
    return 2;
}
"#;
    let file = native().index_file(source, "src/loader.ts");

    assert_eq!(file.imports.len(), 2);
    assert!(file.imports[0].starts_with("import { readFile }"));

    let names: Vec<&str> = file.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Loader", "helper"]);

    let loader = &file.symbols[0];
    assert_eq!(loader.kind, SymbolKind::Class);
    assert!(loader.exported);
    assert_eq!(loader.documentation.as_deref(), Some("/** Loads settings from disk. */"));
    assert_eq!(loader.children.len(), 1);
    assert_eq!(loader.children[0].name, "load");
    assert_eq!(loader.children[0].kind, SymbolKind::Method);
    assert!(!file.symbols[1].exported);

    let view = format_folded_view(&file);
    assert!(view.starts_with("📁 src/loader.ts (typescript, 14 lines)"));
    assert!(view.contains("📦 Imports: 2 statements"));
    assert!(view.contains("◆ Loader [exported] (L5-9)"));
}

#[test]
fn test_python_methods_and_privacy() {
    let source = "class Store:\n    \"\"\"Key value store.\"\"\"\n\n    def get(self, key):\n        return key\n\ndef _internal():\n    pass\n";
    let file = native().index_file(source, "store.py");

    assert_eq!(file.symbols.len(), 2);
    let store = &file.symbols[0];
    assert!(store.exported);
    assert_eq!(store.children[0].name, "get");
    assert_eq!(store.children[0].kind, SymbolKind::Method);
    assert!(!file.symbols[1].exported);

    assert!(find_symbol(&file.symbols, "Store.get").is_some());
    assert!(find_symbol(&file.symbols, "Store.missing").is_none());
}

#[test]
fn test_rust_impl_owns_methods() {
    let source = "pub struct Point {\n    x: i32,\n}\n\nimpl Point {\n    pub fn new() -> Self {\n        Point { x: 0 }\n    }\n}\n";
    let indexer = native();
    let file = indexer.index_file(source, "point.rs");

    let kinds: Vec<SymbolKind> = file.symbols.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SymbolKind::Struct, SymbolKind::Impl]);
    assert_eq!(file.symbols[1].children[0].name, "new");
    assert_eq!(file.symbols[1].children[0].kind, SymbolKind::Method);

    let unfolded = unfold_symbol(&indexer, source, "point.rs", "Point.new", Some(&file)).unwrap();
    assert!(unfolded.starts_with("// 📍 point.rs L6-8\n"));
    assert!(unfolded.contains("pub fn new() -> Self {"));
}

#[test]
fn test_unfold_without_precomputed_index() {
    let source = "// Adds numbers.\nexport function add(a: number, b: number) {\n    return a + b;\n}\n";
    let unfolded = unfold_symbol(&native(), source, "math.ts", "add", None).unwrap();

    assert_eq!(
        unfolded,
        "// 📍 math.ts L1-4\n// Adds numbers.\nexport function add(a: number, b: number) {\n    return a + b;\n}"
    );
}

#[test]
fn test_unsupported_and_degraded_files() -> Result<()> {
    let indexer = native();
    let files = vec![
        SourceFile::new("main.rb", "def hello\nend\n"),
        SourceFile::new("notes.kt", "fun main() {}\n"),
        SourceFile::new("ok.go", "package main\n\nfunc Run() {}\n"),
    ];
    let report = indexer.index_batch_report(&files);

    assert_eq!(report.files.len(), 3);
    assert_eq!(report.files["main.rb"].folded_token_estimate, FALLBACK_TOKEN_ESTIMATE);
    assert!(report.files["notes.kt"].symbols.is_empty());
    assert_eq!(report.files["ok.go"].symbols[0].name, "Run");
    assert!(report.files["ok.go"].symbols[0].exported);

    let degraded: Vec<&str> = report.degraded.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(degraded, vec!["main.rb", "notes.kt"]);
    assert!(report
        .degraded
        .iter()
        .all(|d| d.reason == DegradeReason::UnsupportedLanguage));
    assert_eq!(indexer.diagnostics().degraded_count(), 2);
    Ok(())
}
