//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::check_interactions::{CheckInteractionsParams, check_impl};
use crate::tools::extract_interactions::{ExtractInteractionsParams, extract_impl};

use ddicheck_client::{Checker, FetchConfig, HttpFetcher, InteractionExtractor};
use ddicheck_core::{AppConfig, Error};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for ddicheck.
#[derive(Clone)]
pub struct DdiCheckServer {
    checker: Checker,
    extractor: Arc<InteractionExtractor>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl DdiCheckServer {
    /// Create a new server handler from validated configuration.
    ///
    /// Both tools share one compiled extractor.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let extractor = Arc::new(InteractionExtractor::new(&config.markers)?);
        let fetcher = Arc::new(HttpFetcher::new(FetchConfig::from(config))?);
        let checker = Checker::new(fetcher, extractor.clone(), config.max_concurrency);

        Ok(Self { checker, extractor, tool_router: Self::tool_router() })
    }

    /// Look up drug interactions for a comma-separated list of medications.
    #[tool(
        description = "Check drug interactions for a comma-separated list of medication names. Returns per-drug interaction records (title, detail, severity) or a typed failure, in input order."
    )]
    async fn check_interactions(&self, params: Parameters<CheckInteractionsParams>) -> Result<CallToolResult, McpError> {
        check_impl(&self.checker, params.0).await
    }

    /// Extract interaction records from an already-fetched lookup page.
    ///
    /// No network requests are made.
    #[tool(description = "Extract drug interaction records from lookup page HTML. No network requests are made.")]
    async fn extract_interactions(
        &self, params: Parameters<ExtractInteractionsParams>,
    ) -> Result<CallToolResult, McpError> {
        extract_impl(self.extractor.as_ref(), params.0).await
    }
}

impl ServerHandler for DdiCheckServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "ddicheck".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
