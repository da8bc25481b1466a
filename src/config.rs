use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".codefold";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// File extensions to index
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped while walking (in addition to .gitignore)
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// Files larger than this are skipped
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Maximum directory depth below the root
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Skip dot-files and dot-directories
    #[serde(default = "default_true")]
    pub skip_hidden: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_dirs: default_ignore_dirs(),
            max_file_size_bytes: default_max_file_size_bytes(),
            max_depth: default_max_depth(),
            skip_hidden: default_true(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    [
        "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "pyw", "go", "rs", "rb", "java", "cs",
        "cpp", "c", "h", "hpp", "swift", "kt", "php", "vue", "svelte",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_ignore_dirs() -> Vec<String> {
    [
        "node_modules",
        ".git",
        "dist",
        "build",
        ".next",
        "__pycache__",
        ".venv",
        "venv",
        "env",
        ".env",
        "target",
        "vendor",
        ".cache",
        ".turbo",
        "coverage",
        ".nyc_output",
        ".claude",
        ".smart-file-read",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_file_size_bytes() -> u64 {
    512 * 1024
}

fn default_max_depth() -> usize {
    20
}

fn default_true() -> bool {
    true
}

/// Query engine backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineBackend {
    /// Linked tree-sitter grammars (default)
    #[default]
    Native,
    /// External `tree-sitter query` CLI
    Cli,
}

impl std::fmt::Display for EngineBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineBackend::Native => write!(f, "native"),
            EngineBackend::Cli => write!(f, "cli"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Which engine produces query matches
    #[serde(default)]
    pub backend: EngineBackend,

    /// tree-sitter binary used by the CLI backend
    #[serde(default = "default_tree_sitter_bin")]
    pub tree_sitter_bin: PathBuf,

    /// Directory holding `tree-sitter-<lang>` grammar packages (CLI backend)
    #[serde(default)]
    pub grammar_root: Option<PathBuf>,

    /// Seconds before a CLI invocation is abandoned
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: EngineBackend::default(),
            tree_sitter_bin: default_tree_sitter_bin(),
            grammar_root: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_tree_sitter_bin() -> PathBuf {
    PathBuf::from("tree-sitter")
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default number of matching symbols to return
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
        }
    }
}

fn default_search_limit() -> usize {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Also log to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// File log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory (relative paths resolve against the project root)
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Rotation: hourly, daily, minutely, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: default_true(),
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".codefold/logs")
}

fn default_file_prefix() -> String {
    "codefold.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .codefold directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .codefold directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .codefold directory
    pub fn codefold_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    /// Check if a config directory exists in the given directory
    pub fn is_initialized(root: &Path) -> bool {
        Self::codefold_dir(root).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.indexer.extensions.contains(&"rs".to_string()));
        assert!(config.indexer.extensions.contains(&"ts".to_string()));
        assert!(config.indexer.ignore_dirs.contains(&"node_modules".to_string()));
        assert_eq!(config.indexer.max_file_size_bytes, 512 * 1024);
        assert_eq!(config.indexer.max_depth, 20);
        assert_eq!(config.engine.backend, EngineBackend::Native);
        assert_eq!(config.engine.timeout_secs, 30);
        assert_eq!(config.search.default_limit, 20);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.engine.backend = EngineBackend::Cli;
        config.engine.grammar_root = Some(PathBuf::from("/opt/grammars"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();

        assert_eq!(config.indexer.extensions, loaded.indexer.extensions);
        assert_eq!(loaded.engine.backend, EngineBackend::Cli);
        assert_eq!(loaded.engine.grammar_root, Some(PathBuf::from("/opt/grammars")));
        assert!(Config::is_initialized(dir.path()));
    }

    #[test]
    fn test_load_missing_config_returns_default() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.search.default_limit, 20);
        assert!(!Config::is_initialized(dir.path()));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[engine]\nbackend = \"cli\"\n").unwrap();
        assert_eq!(config.engine.backend, EngineBackend::Cli);
        assert_eq!(config.engine.timeout_secs, 30);
        assert_eq!(config.indexer.max_depth, 20);
    }
}
