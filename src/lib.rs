pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod indexer;
pub mod language;
pub mod logging;
pub mod mcp;
pub mod metrics;
pub mod render;
pub mod search;
pub mod symbol;
pub mod tools;

pub use config::Config;
pub use indexer::Indexer;
pub use language::{detect_language, Language};
pub use search::{search_codebase, SearchOptions, SearchResult};
pub use symbol::{FileIndex, Symbol, SymbolKind};
