//! MCP (Model Context Protocol) server module for codefold.
//!
//! Exposes `smart_search`, `smart_outline` and `smart_unfold` to LLM clients
//! over the stdio transport.
//!
//! ## Usage
//!
//! ```ignore
//! use codefold::mcp::CodefoldServer;
//!
//! let server = CodefoldServer::new(tools);
//! server.run().await?;
//! ```

mod server;

pub use server::CodefoldServer;
