//! MCP tools for searching and reading Paperless documents.

use serde::Deserialize;
use serde_json::json;

use super::registry::ToolDescriptor;
use crate::paperless::FilterCriteria;

// =============================================================================
// Tool Names
// =============================================================================

pub const SEARCH_SNIPPETS_TOOL: &str = "search_paperless_snippets";
pub const GET_DOCUMENT_FULL_TOOL: &str = "get_paperless_document_full";

// =============================================================================
// Tool Descriptors
// =============================================================================

pub fn search_snippets_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: SEARCH_SNIPPETS_TOOL.to_string(),
        description: concat!(
            "Search Paperless documents and return short text previews with metadata and IDs. ",
            "All filters are optional and combined. Text filters match case-insensitive substrings. ",
            "Use get_paperless_document_full with an ID from the results to read a whole document."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "documentTypeName": {
                    "type": "string",
                    "description": "Part of the document type name, e.g. 'invoice'"
                },
                "documentTagName": {
                    "type": "string",
                    "description": "Part of a tag name"
                },
                "correspondent": {
                    "type": "string",
                    "description": "Part of the correspondent name"
                },
                "created_year": {
                    "type": "integer",
                    "description": "Year the document was created"
                },
                "created_month": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 12,
                    "description": "Month the document was created (1-12)"
                }
            }
        }),
    }
}

pub fn get_document_full_descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: GET_DOCUMENT_FULL_TOOL.to_string(),
        description: "Load the full text and metadata of a single Paperless document by ID."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "document_id": {
                    "type": "integer",
                    "description": "Document ID as returned by search_paperless_snippets"
                }
            },
            "required": ["document_id"]
        }),
    }
}

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SearchSnippetsRequest {
    #[serde(default, rename = "documentTypeName")]
    pub document_type_name: Option<String>,
    #[serde(default, rename = "documentTagName")]
    pub document_tag_name: Option<String>,
    #[serde(default)]
    pub correspondent: Option<String>,
    #[serde(default)]
    pub created_year: Option<i32>,
    #[serde(default)]
    pub created_month: Option<u32>,
}

impl SearchSnippetsRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(month) = self.created_month {
            if !(1..=12).contains(&month) {
                return Err(format!("created_month must be between 1 and 12, got {month}"));
            }
        }
        if let Some(year) = self.created_year {
            if year < 1 {
                return Err(format!("created_year must be positive, got {year}"));
            }
        }
        Ok(())
    }
}

impl From<SearchSnippetsRequest> for FilterCriteria {
    fn from(request: SearchSnippetsRequest) -> Self {
        Self {
            document_type: request.document_type_name,
            tag: request.document_tag_name,
            correspondent: request.correspondent,
            created_year: request.created_year,
            created_month: request.created_month,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetDocumentFullRequest {
    pub document_id: u64,
}
