//! Tool result content (MCP `tools/call` result shape).

use serde::{Deserialize, Serialize};

/// Content item in a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success_text(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: true,
        }
    }

    /// Text of the first content item.
    pub fn text(&self) -> Option<&str> {
        self.content.first().map(|item| item.text.as_str())
    }
}
