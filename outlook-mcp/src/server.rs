//! MCP Server implementation for Outlook.
//!
//! Exposes 4 tools for AI agents to browse, filter, search and read mail.

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

use outlook_mcp_core::error::{CoreError, CoreResult, ErrorKind};
use outlook_mcp_core::services::MailService;

use crate::schemas::{FilterParams, ListParams, ReadParams, SearchParams};

const NO_ITEMS: &str = "No items found";
const NO_MATCHES: &str = "No matches found";

const LIST_CONTEXT: &str = "failed to list folder";
const FILTER_CONTEXT: &str = "failed to filter items";
const SEARCH_CONTEXT: &str = "failed to search items";
const READ_CONTEXT: &str = "failed to read item";

/// Map a core error onto an MCP error with a `"<context>: <cause>"` message.
///
/// Upstream failures and timeouts already carry their operation and are
/// passed through.
fn map_core_error(context: &str, error: &CoreError) -> McpError {
    let message = match error {
        CoreError::Upstream { .. } | CoreError::Timeout { .. } => error.to_string(),
        _ => format!("{context}: {error}"),
    };

    if error.is_expected() {
        tracing::warn!("{message}");
    } else {
        tracing::error!("{message}");
    }

    match error.kind() {
        ErrorKind::InvalidInput => McpError::invalid_params(message, None),
        ErrorKind::NotFound => McpError::resource_not_found(message, None),
        _ => McpError::internal_error(message, None),
    }
}

/// Validate parameters, run one mail operation and wrap its output.
async fn run_mail_tool<R, F, Fut>(
    context: &str,
    empty_message: &str,
    request: CoreResult<R>,
    operation: F,
) -> Result<CallToolResult, McpError>
where
    F: FnOnce(R) -> Fut,
    Fut: std::future::Future<Output = CoreResult<String>>,
{
    let request = request.map_err(|e| map_core_error(context, &e))?;
    let output = operation(request)
        .await
        .map_err(|e| map_core_error(context, &e))?;

    let text = if output.trim().is_empty() {
        empty_message.to_string()
    } else {
        output
    };

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// MCP Server for Outlook.
///
/// Provides AI agents with read access to Outlook mail, calendars,
/// contacts and tasks through the Model Context Protocol.
#[derive(Clone)]
pub struct OutlookMcp {
    /// Mail service for all four operations.
    mail_service: Arc<MailService>,
    /// Tool router generated by macro.
    tool_router: ToolRouter<Self>,
}

impl OutlookMcp {
    /// Create a new MCP server instance.
    #[must_use]
    pub fn new(mail_service: Arc<MailService>) -> Self {
        Self {
            mail_service,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl OutlookMcp {
    /// Browse accounts, folders and folder contents.
    #[tool(
        description = "List Outlook accounts (empty path), the folders of an account ('account'), \
                       or the items of a folder ('account/Inbox/Sub'). Returns entry IDs usable with outlook_read."
    )]
    async fn outlook_list(
        &self,
        Parameters(params): Parameters<ListParams>,
    ) -> Result<CallToolResult, McpError> {
        run_mail_tool(LIST_CONTEXT, NO_ITEMS, params.into_request(), |req| async move {
            self.mail_service.list(&req).await
        })
        .await
    }

    /// Filter items by date, sender, type and read state.
    #[tool(
        description = "Filter Outlook items by date range (since/until/days), sender, type \
                       (email, event, contact, task) and unread state. All conditions are combined with AND; \
                       results are sorted newest first."
    )]
    async fn outlook_filter(
        &self,
        Parameters(params): Parameters<FilterParams>,
    ) -> Result<CallToolResult, McpError> {
        run_mail_tool(FILTER_CONTEXT, NO_ITEMS, params.into_request(), |req| async move {
            self.mail_service.filter(&req).await
        })
        .await
    }

    /// Full-text search in one folder.
    #[tool(
        description = "Search message bodies in one folder. Spaces mean OR, '&' means AND: \
                       'ZRH EWR&United' finds items mentioning ZRH or EWR and also United. \
                       Results come in pages of 25; use offset for the next page."
    )]
    async fn outlook_search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        run_mail_tool(SEARCH_CONTEXT, NO_MATCHES, params.into_request(), |req| async move {
            self.mail_service.search(&req).await
        })
        .await
    }

    /// Read one item in full.
    #[tool(
        description = "Read the full content of one Outlook item by entry ID, optionally as JSON, \
                       saving attachments or exporting the HTML or text body to a file."
    )]
    async fn outlook_read(
        &self,
        Parameters(params): Parameters<ReadParams>,
    ) -> Result<CallToolResult, McpError> {
        run_mail_tool(READ_CONTEXT, NO_ITEMS, params.into_request(), |req| async move {
            self.mail_service.read(&req).await
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for OutlookMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Outlook MCP Server - Read-only access to Outlook mail, calendars, contacts and tasks. \
                 Use outlook_list with an empty path to see accounts, then drill into folders with \
                 'account/Folder/Sub' paths. outlook_filter applies structured conditions, \
                 outlook_search matches body text (spaces = OR, '&' = AND), and outlook_read \
                 returns one item by the entry_id the other tools report."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "test_mocks.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
pub(crate) mod test_mocks;

#[cfg(test)]
#[path = "server_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests;

#[cfg(test)]
#[path = "client_integration_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
mod client_integration_tests;
