//! Guarded parallel reading of candidate files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::engine::SourceFile;

/// Bytes inspected for a NUL when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 1000;

/// Read a file unless it is empty, too large, not UTF-8 or looks binary.
pub fn read_guarded(path: &Path, max_size: u64) -> Option<String> {
    let metadata = std::fs::metadata(path).ok()?;
    if metadata.len() == 0 || metadata.len() > max_size {
        debug!("Skipping {} ({} bytes)", path.display(), metadata.len());
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Skipping unreadable {}: {}", path.display(), e);
            return None;
        }
    };

    let sniff = &content.as_bytes()[..content.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        debug!("Skipping binary {}", path.display());
        return None;
    }

    Some(content)
}

/// Path of `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read the candidates in parallel, keeping walk order.
///
/// `file_pattern` is matched case-insensitively against the relative path
/// before any IO happens.
pub fn read_sources(
    root: &Path,
    paths: Vec<PathBuf>,
    file_pattern: Option<&str>,
    max_size: u64,
) -> Vec<SourceFile> {
    let pattern = file_pattern.filter(|p| !p.is_empty()).map(str::to_lowercase);

    let candidates: Vec<(String, PathBuf)> = paths
        .into_iter()
        .map(|path| (relative_path(root, &path), path))
        .filter(|(rel, _)| match &pattern {
            Some(p) => rel.to_lowercase().contains(p.as_str()),
            None => true,
        })
        .collect();

    candidates
        .into_par_iter()
        .filter_map(|(rel, path)| {
            let content = read_guarded(&path, max_size)?;
            Some(SourceFile::new(rel, content).with_absolute_path(path))
        })
        .collect()
}
