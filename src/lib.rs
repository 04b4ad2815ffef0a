//! NIH RePORTER MCP Server
//!
//! An MCP server that lets AI agents search NIH RePORTER for grant and project
//! information. Each call forwards a text query plus optional filters (fiscal year,
//! activity code, organization, principal investigator) to the projects search API
//! and returns the raw reply as text.
//!
//! Results start with `NIH RePORTER API Results: `; transport failures are reported
//! in-band as text starting with `Error querying NIH RePORTER API: `.

pub mod config;
pub mod error;
pub mod search;
pub mod secret;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};

pub use config::Config;
pub use error::ReporterError;
pub use search::{
    ERROR_PREFIX, GrantSearchTool, RESULTS_PREFIX, SearchFilters, SearchRequest,
    build_request_body,
};
pub use secret::{EnvSecretProvider, SecretError, SecretProvider, StaticSecretProvider};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

#[derive(Clone)]
pub struct Server {
    tool_router: ToolRouter<Self>,
    tool: GrantSearchTool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Server {
    pub fn new(tool: GrantSearchTool) -> Self {
        tracing::info!("Using NIH RePORTER endpoint: {}", tool.endpoint());

        Self {
            tool_router: Self::tool_router(),
            tool,
        }
    }

    /// Public wrapper for the search tool (for testing).
    pub async fn search(&self, filters: SearchFilters) -> Result<String, McpError> {
        self.tool
            .execute(&filters)
            .await
            .map_err(|e| e.to_mcp_error())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations: Tool Router
//--------------------------------------------------------------------------------------------------

#[tool_router]
impl Server {
    /// Searches NIH RePORTER for grants and projects.
    ///
    /// Requires the NIH_REPORTER_API_KEY secret.
    #[tool(
        name = "nih_reporter__search_projects",
        description = "Query NIH RePORTER for grant and project information."
    )]
    async fn search_projects(
        &self,
        params: Parameters<SearchFilters>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.search(params.0).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations: Server Handler
//--------------------------------------------------------------------------------------------------

#[tool_handler]
impl ServerHandler for Server {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Search NIH-funded grants and projects by keyword, fiscal year, activity code, \
                 organization or principal investigator."
                    .into(),
            ),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn create_server() -> Server {
        let tool = GrantSearchTool::new(Arc::new(StaticSecretProvider::new())).unwrap();
        Server::new(tool)
    }

    #[test]
    fn test_server_registers_search_tool() {
        let server = create_server();
        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "nih_reporter__search_projects");
    }

    #[test]
    fn test_server_info_enables_tools() {
        let info = create_server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }

    #[tokio::test]
    async fn test_search_empty_query_is_invalid_params() {
        let server = create_server();
        let err = server.search(SearchFilters::default()).await.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Query must not be empty");
    }
}
