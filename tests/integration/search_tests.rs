use anyhow::Result;

use codefold::engine::NativeEngine;
use codefold::indexer::DegradeReason;
use codefold::render::format_search_results;
use codefold::{search_codebase, Indexer, SearchOptions};

use crate::helpers::{LineEngine, TestTree};

fn options(max_results: usize) -> SearchOptions {
    SearchOptions {
        max_results,
        file_pattern: None,
    }
}

#[test]
fn test_search_finds_single_symbol() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("alpha.ts", "export function alpha() { return 1; }\n")?;
    tree.create_file("beta.ts", "export function beta() { return 2; }\n")?;

    let engine = LineEngine::new();
    let calls = engine.calls.clone();
    let indexer = Indexer::new(Box::new(engine));

    let result = search_codebase(&indexer, tree.path(), "alpha", &options(5));

    assert_eq!(result.matching_symbols.len(), 1);
    assert_eq!(result.matching_symbols[0].symbol_name, "alpha");
    assert_eq!(result.folded_files.len(), 1);
    assert_eq!(result.folded_files[0].file_path, "alpha.ts");
    assert_eq!(result.total_files_scanned, 2);
    assert_eq!(result.total_symbols_found, 2);
    assert_eq!(result.token_estimate, result.folded_files[0].folded_token_estimate);

    // One engine call for the whole TypeScript group
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_ignored_directories_are_never_scanned() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("src/app.ts", "function app() {}\n")?;
    tree.create_file("node_modules/lib/index.ts", "export function app() {}\n")?;
    tree.create_file("dist/app.ts", "export function app() {}\n")?;

    let indexer = Indexer::new(Box::new(LineEngine::new()));
    let result = search_codebase(&indexer, tree.path(), "node_modules", &options(20));

    assert_eq!(result.total_files_scanned, 1);
    assert!(result.folded_files.is_empty());

    let result = search_codebase(&indexer, tree.path(), "app", &options(20));
    assert_eq!(result.total_files_scanned, 1);
    assert_eq!(result.matching_symbols.len(), 1);
    assert_eq!(result.matching_symbols[0].file_path, "src/app.ts");
    Ok(())
}

#[test]
fn test_file_pattern_narrows_the_walk() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("src/parse.ts", "function parseFile() {}\n")?;
    tree.create_file("test/parse.ts", "function parseFixture() {}\n")?;

    let indexer = Indexer::new(Box::new(LineEngine::new()));
    let result = search_codebase(
        &indexer,
        tree.path(),
        "parse",
        &SearchOptions {
            max_results: 20,
            file_pattern: Some("src/".to_string()),
        },
    );

    assert_eq!(result.total_files_scanned, 1);
    assert_eq!(result.matching_symbols.len(), 1);
    assert_eq!(result.matching_symbols[0].symbol_name, "parseFile");
    Ok(())
}

#[test]
fn test_ranking_and_limit() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file(
        "lib.ts",
        "function loadConfig() {}\nfunction configLoader() {}\nfunction load() {}\nfunction unrelated() {}\n",
    )?;

    let indexer = Indexer::new(Box::new(LineEngine::new()));

    let result = search_codebase(&indexer, tree.path(), "load", &options(20));
    let names: Vec<&str> = result
        .matching_symbols
        .iter()
        .map(|m| m.symbol_name.as_str())
        .collect();
    assert_eq!(names, vec!["load", "loadConfig", "configLoader"]);
    assert_eq!(result.matching_symbols[0].match_reason, "name match + signature");

    let limited = search_codebase(&indexer, tree.path(), "load", &options(1));
    assert_eq!(limited.matching_symbols.len(), 1);
    assert_eq!(limited.matching_symbols[0].symbol_name, "load");

    // Zero falls back to the default limit
    let defaulted = search_codebase(&indexer, tree.path(), "load", &options(0));
    assert_eq!(defaulted.matching_symbols.len(), 3);
    Ok(())
}

#[test]
fn test_native_search_reports_degraded_files() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("tasks.rb", "def run_task\nend\n")?;
    tree.create_file("tasks.py", "def run_task():\n    pass\n")?;

    let indexer = Indexer::new(Box::new(NativeEngine::new()));
    let result = search_codebase(&indexer, tree.path(), "run_task", &options(10));

    assert_eq!(result.total_files_scanned, 2);
    assert_eq!(result.matching_symbols.len(), 1);
    assert_eq!(result.matching_symbols[0].file_path, "tasks.py");
    assert_eq!(result.degraded_files.len(), 1);
    assert_eq!(result.degraded_files[0].path, "tasks.rb");
    assert_eq!(result.degraded_files[0].reason, DegradeReason::UnsupportedLanguage);
    Ok(())
}

#[test]
fn test_empty_report_text() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("a.ts", "function a() {}\n")?;

    let indexer = Indexer::new(Box::new(LineEngine::new()));
    let result = search_codebase(&indexer, tree.path(), "zzz", &options(20));
    let report = format_search_results(&result, "zzz");

    assert!(result.matching_symbols.is_empty());
    assert!(report.starts_with("🔍 Smart Search: \"zzz\""));
    assert!(report.ends_with("No matching symbols found."));
    Ok(())
}

#[test]
fn test_repeat_searches_do_not_grow_diagnostics() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("app.ts", "function app() {}\n")?;
    tree.create_file("Main.kt", "fun main() {}\n")?;

    let indexer = Indexer::new(Box::new(LineEngine::new()));
    for _ in 0..5 {
        let result = search_codebase(&indexer, tree.path(), "app", &options(20));
        assert_eq!(result.degraded_files.len(), 1);
        assert_eq!(indexer.diagnostics().degraded_count(), 1);
    }
    Ok(())
}
