//! Record of files indexed without symbols.

use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;
use serde::Serialize;

use crate::language::Language;

/// Why a file was indexed without symbols
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradeReason {
    /// No grammar is available for the detected language
    UnsupportedLanguage,
    /// The query engine failed for the file's batch
    EngineFailure(String),
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradeReason::UnsupportedLanguage => write!(f, "unsupported language"),
            DegradeReason::EngineFailure(e) => write!(f, "engine failure: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradedFile {
    pub path: String,
    pub language: Language,
    pub reason: DegradeReason,
}

/// Latest degrade state per path; clones share the same record
///
/// Re-indexing a path replaces its entry, so a long-lived indexer holds at
/// most one entry per degraded file.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    degraded: Arc<Mutex<IndexMap<String, DegradedFile>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, DegradedFile>> {
        self.degraded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, file: DegradedFile) {
        self.lock().insert(file.path.clone(), file);
    }

    /// Forget a path that has since been indexed with a grammar.
    pub fn resolve(&self, path: &str) {
        self.lock().shift_remove(path);
    }

    pub fn degraded_count(&self) -> usize {
        self.lock().len()
    }

    /// Copy of the current record, in first-recorded order
    pub fn degraded_files(&self) -> Vec<DegradedFile> {
        self.lock().values().cloned().collect()
    }

    /// Number of degraded files per reason label, in first-seen order
    pub fn summary(&self) -> Vec<(String, usize)> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for file in self.lock().values() {
            let label = match &file.reason {
                DegradeReason::UnsupportedLanguage => {
                    format!("unsupported language ({})", file.language)
                }
                DegradeReason::EngineFailure(_) => format!("engine failure ({})", file.language),
            };
            *counts.entry(label).or_default() += 1;
        }
        counts.into_iter().collect()
    }
}
