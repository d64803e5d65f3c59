//! Tool registry - central routing for MCP tools.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::mcp::content::ToolResult;
use crate::paperless::{PaperlessTools, StatusNotifier};

use super::paperless::{
    self, GetDocumentFullRequest, SearchSnippetsRequest, GET_DOCUMENT_FULL_TOOL,
    SEARCH_SNIPPETS_TOOL,
};

/// Tool descriptor conforming to MCP specification.
#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Central registry for all MCP tools.
pub struct ToolRegistry {
    paperless: PaperlessTools,
}

impl ToolRegistry {
    pub fn new(paperless: PaperlessTools) -> Self {
        Self { paperless }
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        vec![
            paperless::search_snippets_descriptor(),
            paperless::get_document_full_descriptor(),
        ]
    }

    /// Call a tool by name. Status updates produced while it runs go to `notifier`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> ToolResult {
        match name {
            SEARCH_SNIPPETS_TOOL => self.call_search_snippets(arguments, notifier).await,
            GET_DOCUMENT_FULL_TOOL => self.call_get_document_full(arguments, notifier).await,
            _ => ToolResult::error(format!(
                "Tool '{}' is not available. Available tools: {}, {}",
                name, SEARCH_SNIPPETS_TOOL, GET_DOCUMENT_FULL_TOOL,
            )),
        }
    }

    async fn call_search_snippets(
        &self,
        arguments: Option<Value>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> ToolResult {
        let request = match parse_arguments::<SearchSnippetsRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        if let Err(validation_error) = request.validate() {
            return ToolResult::error(validation_error);
        }

        let text = self
            .paperless
            .search_snippets(request.into(), notifier)
            .await;
        ToolResult::success_text(text)
    }

    async fn call_get_document_full(
        &self,
        arguments: Option<Value>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> ToolResult {
        let request = match parse_arguments::<GetDocumentFullRequest>(arguments) {
            Ok(req) => req,
            Err(err) => return ToolResult::error(err),
        };

        let text = self.paperless.get_full(request.document_id, notifier).await;
        ToolResult::success_text(text)
    }
}

fn parse_arguments<T: for<'de> Deserialize<'de>>(arguments: Option<Value>) -> Result<T, String> {
    let value = match arguments {
        None | Some(Value::Null) => json!({}),
        Some(value) => value,
    };
    serde_json::from_value(value).map_err(|err| format!("Invalid arguments: {}", err))
}
