use ignore::WalkBuilder;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::config::IndexerConfig;

/// Walks a source tree, yielding candidate files for indexing
pub struct Walker {
    root: PathBuf,
    extensions: HashSet<String>,
    ignore_dirs: HashSet<String>,
    max_depth: usize,
    skip_hidden: bool,
}

impl Walker {
    /// Create a new Walker with the given root directory and configuration
    pub fn new(root: impl Into<PathBuf>, config: &IndexerConfig) -> Self {
        Self {
            root: root.into(),
            extensions: config.extensions.iter().cloned().collect(),
            ignore_dirs: config.ignore_dirs.iter().cloned().collect(),
            max_depth: config.max_depth,
            skip_hidden: config.skip_hidden,
        }
    }

    /// Walk the directory tree and return an iterator of file paths
    ///
    /// This respects:
    /// - .gitignore files
    /// - the configured ignore list, matched against entry names
    /// - hidden entries and the depth limit
    /// - file extension filtering
    pub fn walk(&self) -> impl Iterator<Item = PathBuf> {
        let mut builder = WalkBuilder::new(&self.root);

        builder.git_ignore(true);
        builder.git_global(true);
        builder.git_exclude(true);
        builder.hidden(self.skip_hidden);
        builder.max_depth(Some(self.max_depth));

        let ignore_dirs = self.ignore_dirs.clone();
        builder.filter_entry(move |entry| {
            entry.depth() == 0
                || !entry
                    .file_name()
                    .to_str()
                    .map(|name| ignore_dirs.contains(name))
                    .unwrap_or(false)
        });

        let extensions = self.extensions.clone();

        builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(move |entry| {
                entry
                    .path()
                    .extension()
                    .and_then(OsStr::to_str)
                    .map(|ext| extensions.contains(ext))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
    }

    /// Collect all walkable files into a Vec
    pub fn collect_files(&self) -> Vec<PathBuf> {
        self.walk().collect()
    }
}
