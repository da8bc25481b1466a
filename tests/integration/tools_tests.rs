use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use codefold::engine::NativeEngine;
use codefold::tools::{ToolError, Tools, SMART_OUTLINE, SMART_SEARCH, SMART_UNFOLD, TOOLS};
use codefold::Indexer;

use crate::helpers::TestTree;

fn tools(tree: &TestTree) -> Tools {
    Tools::new(Arc::new(Indexer::new(Box::new(NativeEngine::new()))), tree.path())
}

#[test]
fn test_tool_catalogue() {
    let names: Vec<&str> = TOOLS.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec![SMART_SEARCH, SMART_OUTLINE, SMART_UNFOLD]);
    assert!(TOOLS.iter().all(|(_, description)| !description.is_empty()));
}

#[test]
fn test_search_then_unfold_workflow() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file(
        "src/config.ts",
        "/** Reads the config file. */\nexport function loadConfig(path: string) {\n    return path;\n}\n",
    )?;
    tree.create_file("src/other.ts", "export function render() {}\n")?;
    let tools = tools(&tree);

    let report = tools.call_tool(SMART_SEARCH, json!({"query": "loadConfig", "max_results": 5}))?;
    assert!(report.starts_with("🔍 Smart Search: \"loadConfig\""));
    assert!(report.contains("Scanned 2 files, found 2 symbols"));
    assert!(report.contains("src/config.ts"));
    assert!(!report.contains("src/other.ts"));

    let outline = tools.call_tool(SMART_OUTLINE, json!({"file_path": "src/config.ts"}))?;
    assert!(outline.contains("ƒ loadConfig [exported] (L2-4)"));
    assert!(outline.contains("💬 Reads the config file."));

    let source = tools.call_tool(
        SMART_UNFOLD,
        json!({"file_path": "src/config.ts", "symbol_name": "loadConfig"}),
    )?;
    assert!(source.starts_with("// 📍 "));
    assert!(source.contains("L1-4\n/** Reads the config file. */"));
    Ok(())
}

#[test]
fn test_search_scoped_to_path_and_pattern() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("api/handler.py", "def handle():\n    pass\n")?;
    tree.create_file("web/handler.py", "def handle():\n    pass\n")?;
    let tools = tools(&tree);

    let report = tools.call_tool(SMART_SEARCH, json!({"query": "handle", "path": "api"}))?;
    assert!(report.contains("Scanned 1 files"));

    let report = tools.call_tool(
        SMART_SEARCH,
        json!({"query": "handle", "file_pattern": "web/"}),
    )?;
    assert!(report.contains("Scanned 1 files"));
    assert!(report.contains("web/handler.py"));
    Ok(())
}

#[test]
fn test_errors_surface_to_callers() -> Result<()> {
    let tree = TestTree::new()?;
    let tools = tools(&tree);

    let err = tools.call_tool("smart_rename", json!({})).unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool(_)));

    let err = tools.call_tool(SMART_OUTLINE, json!({"path": "x.rs"})).unwrap_err();
    assert!(err.to_string().starts_with("Invalid arguments for smart_outline"));

    let err = tools
        .call_tool(SMART_UNFOLD, json!({"file_path": "gone.rs", "symbol_name": "f"}))
        .unwrap_err();
    assert!(matches!(err, ToolError::Read { .. }));
    Ok(())
}

#[test]
fn test_unfold_unsupported_file() -> Result<()> {
    let tree = TestTree::new()?;
    tree.create_file("build.gradle.kts", "plugins {}\n")?;

    let out = tools(&tree).call_tool(
        SMART_UNFOLD,
        json!({"file_path": "build.gradle.kts", "symbol_name": "plugins"}),
    )?;
    assert_eq!(
        out,
        "Could not parse build.gradle.kts. File may be unsupported or empty."
    );
    Ok(())
}
