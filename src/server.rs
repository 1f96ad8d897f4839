//! MCP Server implementation exposing the Contentstack tools.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorCode, ErrorData as McpError,
        Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    RoleServer, ServerHandler,
};
use serde_json::{Map, Value};

use crate::debug::DebugLogger;
use crate::tools::{tool_catalog, ToolDispatcher};

/// Contentstack MCP Server.
#[derive(Clone)]
pub struct ContentstackServer {
    dispatcher: Arc<ToolDispatcher>,
    debug: Arc<DebugLogger>,
}

impl ContentstackServer {
    pub fn new(dispatcher: ToolDispatcher, debug: Arc<DebugLogger>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            debug,
        }
    }

    /// Tool list as advertised over MCP.
    pub fn tools() -> Vec<Tool> {
        tool_catalog()
            .iter()
            .map(|tool| {
                let schema: Map<String, Value> =
                    tool.input_schema.as_object().cloned().unwrap_or_default();
                Tool::new(tool.name, tool.description, Arc::new(schema))
            })
            .collect()
    }

    /// Run one tool call and render the result as pretty JSON text.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, McpError> {
        self.debug.log_tool_call(
            name,
            &arguments.clone().map(Value::Object).unwrap_or(Value::Null),
        );

        let json = match self.dispatcher.dispatch(name, arguments).await {
            Ok(json) => json,
            Err(e) => {
                self.debug.log_error(name, &e.to_string());
                return Err(e.into_mcp_error());
            }
        };
        self.debug.log_tool_result(name, &json);

        let text = serde_json::to_string_pretty(&json).map_err(to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

/// Convert any error to McpError
fn to_mcp_error<E: std::fmt::Display>(e: E) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

impl ServerHandler for ContentstackServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Contentstack MCP Server - Manage content types, entries, assets, environments, \
                publishing, languages and localization through the Contentstack Content \
                Management API. Every tool accepts an optional region override."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(Self::tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.call(&request.name, request.arguments).await }
    }
}
