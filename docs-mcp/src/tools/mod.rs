//! MCP Tools for Google Docs
//!
//! Handlers are grouped by area; each returns a [`ToolOutput`] (summary text
//! plus structured data) or an error that is reported back to the model as a
//! failed tool call rather than a protocol error.

mod catalog;
mod drive;
mod format;
mod read;
mod structure;
mod text;

use crate::google_api::{FetchedDocument, GoogleDocsClient};
use crate::validation;
use anyhow::anyhow;
use bridge_config::Settings;
use rmcp::{
    handler::server::ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
    ErrorData as McpError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// MCP Server for Google Docs
///
/// One instance per MCP session. A bearer token on the HTTP request that
/// carries a tool call takes precedence; otherwise the session's own token
/// (configured, or set with [`GoogleDocsServer::set_access_token`]) is used.
#[derive(Clone)]
pub struct GoogleDocsServer {
    access_token: Arc<RwLock<Option<String>>>,
    settings: Arc<Settings>,
}

impl GoogleDocsServer {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            access_token: Arc::new(RwLock::new(settings.access_token.clone())),
            settings,
        }
    }

    async fn resolve_token(&self, request_token: Option<String>) -> Option<String> {
        match request_token {
            Some(token) => Some(token),
            None => self.access_token.read().await.clone(),
        }
    }

    async fn get_client(&self, request_token: Option<String>) -> Option<GoogleDocsClient> {
        self.resolve_token(request_token).await.map(|token| {
            GoogleDocsClient::with_endpoints(token, &self.settings.docs_api_base, &self.settings.drive_api_base)
        })
    }

    /// Set this session's token from a raw `Authorization` value or bare token
    pub async fn set_access_token(&self, token: String) {
        if let Some(token) = bearer_token(&token) {
            debug!("Setting access token");
            *self.access_token.write().await = Some(token);
        }
    }

    async fn dispatch(&self, client: &GoogleDocsClient, name: &str, args: JsonObject) -> ToolResult {
        match name {
            "list_documents" => self.list_documents(client, args).await,
            "search_documents" => self.search_documents(client, args).await,
            "get_document_info" => self.get_document_info(client, args).await,
            "create_document" => self.create_document(client, args).await,
            "copy_document" => self.copy_document(client, args).await,
            "rename_document" => self.rename_document(client, args).await,
            "delete_document" => self.delete_document(client, args).await,

            "read_document" => self.read_document(client, args).await,
            "list_document_tabs" => self.list_document_tabs(client, args).await,
            "get_word_count" => self.get_word_count(client, args).await,

            "search_text_in_document" => self.search_text_in_document(client, args).await,
            "find_and_replace" => self.find_and_replace(client, args).await,
            "insert_text" => self.insert_text(client, args).await,
            "append_text" => self.append_text(client, args).await,
            "delete_range" => self.delete_range(client, args).await,
            "transform_case" => self.transform_case(client, args).await,

            "format_text" => self.format_text(client, args).await,
            "format_paragraph" => self.format_paragraph(client, args).await,
            "clear_formatting" => self.clear_formatting(client, args).await,

            "insert_page_break" => self.insert_page_break(client, args).await,
            "insert_section_break" => self.insert_section_break(client, args).await,
            "create_bullet_list" => self.create_bullet_list(client, args).await,
            "remove_bullet_list" => self.remove_bullet_list(client, args).await,
            "create_header" => self.create_header_footer(client, args, true).await,
            "create_footer" => self.create_header_footer(client, args, false).await,

            "insert_table" => self.insert_table(client, args).await,
            "insert_table_row" => self.insert_table_row(client, args).await,
            "insert_table_column" => self.insert_table_column(client, args).await,
            "delete_table_row" => self.delete_table_row(client, args).await,
            "delete_table_column" => self.delete_table_column(client, args).await,

            "insert_image" => self.insert_image(client, args).await,

            _ => Err(anyhow!("Unknown tool: {}", name)),
        }
    }
}

/// Token from an `Authorization` value, with or without the `Bearer ` prefix
fn bearer_token(value: &str) -> Option<String> {
    let value = value.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Bearer token from the HTTP request a tool call arrived on
fn request_token(parts: Option<&http::request::Parts>) -> Option<String> {
    parts?
        .headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(bearer_token)
}

/// Successful tool result: a summary for the model plus structured data
pub(crate) struct ToolOutput {
    text: String,
    data: Value,
}

impl ToolOutput {
    pub(crate) fn new(text: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            text: text.into(),
            data: serde_json::to_value(data).unwrap_or_default(),
        }
    }
}

pub(crate) type ToolResult = anyhow::Result<ToolOutput>;

pub(crate) fn parse_args<T: DeserializeOwned>(args: JsonObject) -> anyhow::Result<T> {
    serde_json::from_value(Value::Object(args)).map_err(|e| anyhow!("Invalid arguments: {}", e))
}

/// Validate the document ID and fetch the document with all tabs
pub(crate) async fn fetch_document(client: &GoogleDocsClient, document_id: &str) -> anyhow::Result<FetchedDocument> {
    let document_id = validation::document_id(document_id)?;
    client.get_document(&document_id).await
}

fn into_call_result(tool: &str, result: ToolResult) -> CallToolResult {
    match result {
        Ok(output) => {
            let mut result = CallToolResult::success(vec![Content::text(output.text)]);
            result.structured_content = Some(output.data);
            result
        }
        Err(e) => {
            error!("Error in {}: {:#}", tool, e);
            CallToolResult::error(vec![Content::text(format!("Error in {}: {:#}", tool, e))])
        }
    }
}

impl ServerHandler for GoogleDocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Google Docs and Drive tools. Read documents, search their text, edit, format \
                and restructure them. Document indices are UTF-16 code units starting at 1; \
                use search_text_in_document to find the indices of a passage before editing it."
                    .into(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: catalog::tools(),
            next_cursor: None,
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let name = request.name.as_ref();
            let arguments = request.arguments.clone().unwrap_or_default();

            info!("Calling tool: {}", name);
            debug!("Tool arguments: {:?}", arguments);

            // The streamable HTTP transport attaches the request head
            let token = request_token(context.extensions.get::<http::request::Parts>());
            let client = match self.get_client(token).await {
                Some(c) => c,
                None => {
                    return Ok(CallToolResult::error(vec![Content::text(
                        "Error: Not authenticated. Send a Google OAuth token in the Authorization \
                        header or set GOOGLE_ACCESS_TOKEN.",
                    )]));
                }
            };

            let result = self.dispatch(&client, name, arguments).await;
            Ok(into_call_result(name, result))
        }
    }
}
