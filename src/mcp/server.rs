//! MCP server exposing the folding tools over stdio.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};

use crate::tools::{OutlineArgs, SearchArgs, ToolError, Tools, UnfoldArgs};

/// MCP server for structural code search
///
/// Every tool call runs on the blocking pool, since indexing is synchronous
/// and may invoke an external process.
#[derive(Clone)]
pub struct CodefoldServer {
    tools: Tools,
    tool_router: ToolRouter<Self>,
}

fn to_mcp_error(err: ToolError) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

async fn run_blocking<F>(job: F) -> Result<CallToolResult, McpError>
where
    F: FnOnce() -> Result<String, ToolError> + Send + 'static,
{
    let text = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| McpError::internal_error(format!("Tool task failed: {}", e), None))?
        .map_err(to_mcp_error)?;

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_router]
impl CodefoldServer {
    pub fn new(tools: Tools) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "smart_search",
        description = "Search codebase for symbols, functions, classes using tree-sitter AST parsing. Returns folded structural views with token counts."
    )]
    async fn smart_search(
        &self,
        Parameters(req): Parameters<SearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let tools = self.tools.clone();
        run_blocking(move || tools.smart_search(req)).await
    }

    #[tool(
        name = "smart_outline",
        description = "Get structural outline of a file with symbol signatures and folded bodies."
    )]
    async fn smart_outline(
        &self,
        Parameters(req): Parameters<OutlineArgs>,
    ) -> Result<CallToolResult, McpError> {
        let tools = self.tools.clone();
        run_blocking(move || tools.smart_outline(req)).await
    }

    #[tool(
        name = "smart_unfold",
        description = "Expand one symbol from a file and return full source for that symbol only."
    )]
    async fn smart_unfold(
        &self,
        Parameters(req): Parameters<UnfoldArgs>,
    ) -> Result<CallToolResult, McpError> {
        let tools = self.tools.clone();
        run_blocking(move || tools.smart_unfold(req)).await
    }

    /// Run the MCP server using stdio transport
    pub async fn run(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for CodefoldServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "codefold".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("codefold structural search".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "codefold - folded structural views of source code.\n\n\
                 Available tools:\n\
                 - smart_search: Find symbols by fuzzy name and get folded views of their files\n\
                 - smart_outline: Outline one file with signatures and line ranges\n\
                 - smart_unfold: Read the full source of one symbol\n\n\
                 Search or outline first, then unfold only the symbols you need."
                    .into(),
            ),
        }
    }
}
