//! Stats command: index the tree once and report what degraded

use anyhow::Result;
use indexmap::IndexMap;
use std::env;
use std::path::PathBuf;
use std::time::Instant;

use crate::indexer::{BatchReport, Indexer};
use crate::language::Language;
use crate::metrics::{gather_metrics, MetricSnapshot};
use crate::Config;

/// Per-language totals of one indexing pass
#[derive(Debug, Default, PartialEq)]
pub struct LanguageStats {
    pub files: usize,
    pub symbols: usize,
    pub lines: usize,
}

/// Aggregate a batch report by language, in first-seen order
pub fn summarize(report: &BatchReport) -> IndexMap<Language, LanguageStats> {
    let mut by_language: IndexMap<Language, LanguageStats> = IndexMap::new();
    for file in report.files.values() {
        let stats = by_language.entry(file.language).or_default();
        stats.files += 1;
        stats.symbols += file.symbol_count();
        stats.lines += file.total_lines;
    }
    by_language
}

/// Run the stats command
///
/// # Arguments
/// * `path` - Directory to index (default: current directory)
/// * `prometheus` - If true, output in Prometheus text format
pub fn run(config: &Config, path: Option<PathBuf>, prometheus: bool) -> Result<()> {
    let cwd = env::current_dir()?;
    let root = path.map(|p| cwd.join(p)).unwrap_or_else(|| cwd.clone());

    let indexer = Indexer::from_config(config)?;
    let started = Instant::now();
    let sources = indexer.collect_sources(&root, None);
    let report = indexer.index_batch_report(&sources);
    let elapsed = started.elapsed();

    if prometheus {
        print!("{}", gather_metrics());
        return Ok(());
    }

    let snapshot = MetricSnapshot::capture();

    println!("codefold Index Statistics");
    println!("=========================\n");

    println!("Root:   {}", root.display());
    println!("Engine: {}", indexer.engine_name());
    println!("Time:   {:.2}s\n", elapsed.as_secs_f64());

    println!("Files by language:");
    for (language, stats) in summarize(&report) {
        println!(
            "  {:<12} {:>6} files {:>8} symbols {:>10} lines",
            language.as_str(),
            stats.files,
            stats.symbols,
            stats.lines
        );
    }
    println!();

    println!("Engine Metrics:");
    println!("  Files indexed:      {:.0}", snapshot.files_indexed);
    println!("  Engine invocations: {:.0}", snapshot.engine_invocations);
    println!("  Degraded files:     {:.0}", snapshot.degraded_files);

    let summary = indexer.diagnostics().summary();
    if !summary.is_empty() {
        println!();
        println!("Degraded:");
        for (label, count) in summary {
            println!("  {}: {}", label, count);
        }
        for file in report.degraded.iter().take(5) {
            println!("    - {}: {}", file.path, file.reason);
        }
        if report.degraded.len() > 5 {
            println!("    ... and {} more", report.degraded.len() - 5);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{FileIndex, Symbol, SymbolKind};

    fn file(path: &str, language: Language, symbols: Vec<Symbol>, lines: usize) -> FileIndex {
        FileIndex {
            file_path: path.to_string(),
            language,
            symbols,
            imports: vec![],
            total_lines: lines,
            folded_token_estimate: 0,
        }
    }

    #[test]
    fn test_summarize_by_language() {
        let mut report = BatchReport::default();
        report.files.insert(
            "a.rs".to_string(),
            file(
                "a.rs",
                Language::Rust,
                vec![Symbol::new("A", SymbolKind::Impl, "impl A", 0, 4)
                    .with_children(vec![Symbol::new("f", SymbolKind::Method, "fn f()", 1, 3)])],
                5,
            ),
        );
        report.files.insert("b.kt".to_string(), file("b.kt", Language::Unknown, vec![], 7));
        report.files.insert("c.rs".to_string(), file("c.rs", Language::Rust, vec![], 2));

        let summary = summarize(&report);
        let languages: Vec<Language> = summary.keys().copied().collect();
        assert_eq!(languages, vec![Language::Rust, Language::Unknown]);
        assert_eq!(
            summary[&Language::Rust],
            LanguageStats {
                files: 2,
                symbols: 2,
                lines: 7
            }
        );
    }
}
