// Test helpers: temporary source trees and a scripted query engine

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use codefold::engine::{Capture, EngineError, Match, QueryEngine, SourceFile};
use codefold::Language;

pub struct TestTree {
    pub temp_dir: TempDir,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn create_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// Engine that reports a `func` match for every line starting with
/// `function <name>` or `export function <name>`.
///
/// Exported lines also get an `exp` capture covering the line.
pub struct LineEngine {
    pub calls: Arc<AtomicUsize>,
}

impl LineEngine {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn scan(content: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        for (row, line) in content.split('\n').enumerate() {
            let (exported, rest) = match line.strip_prefix("export ") {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            let Some(rest) = rest.strip_prefix("function ") else {
                continue;
            };
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();

            let mut m = Match::new(0);
            m.captures.push(span("func", row, line.len(), None));
            m.captures.push(span("name", row, line.len(), Some(name)));
            matches.push(m);

            if exported {
                let mut exp = Match::new(1);
                exp.captures.push(span("exp", row, line.len(), None));
                matches.push(exp);
            }
        }
        matches
    }
}

fn span(tag: &str, row: usize, width: usize, text: Option<String>) -> Capture {
    Capture {
        tag: tag.to_string(),
        start_row: row,
        start_col: 0,
        end_row: row,
        end_col: width,
        text,
    }
}

impl QueryEngine for LineEngine {
    fn name(&self) -> &'static str {
        "line"
    }

    fn supports(&self, language: Language) -> bool {
        matches!(language, Language::TypeScript | Language::JavaScript)
    }

    fn run(&self, _language: Language, files: &[SourceFile]) -> Result<Vec<Vec<Match>>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(files.iter().map(|f| Self::scan(&f.content)).collect())
    }
}
