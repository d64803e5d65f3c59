//! Records exchanged with the Paperless document API.
//!
//! `RawDocument` and `DocumentPage` mirror the server JSON. `DocumentSummary`
//! and `DocumentFull` are the shapes handed back to the assistant.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Appended to a snippet when the content was cut.
pub const TRUNCATION_MARKER: &str = "...";

pub const DEFAULT_MAX_DOCUMENTS: usize = 10;
pub const DEFAULT_SNIPPET_LENGTH: usize = 1500;

// =============================================================================
// Filters and limits
// =============================================================================

/// Optional search filters. Every field left as `None` (or blank) is not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Substring of the document type name, case-insensitive.
    pub document_type: Option<String>,
    /// Substring of a tag name, case-insensitive.
    pub tag: Option<String>,
    /// Substring of the correspondent name, case-insensitive.
    pub correspondent: Option<String>,
    pub created_year: Option<i32>,
    pub created_month: Option<u32>,
}

impl FilterCriteria {
    /// Query parameters for the first listing request.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        let text_filters = [
            ("document_type__name__icontains", &self.document_type),
            ("tags__name__icontains", &self.tag),
            ("correspondent__name__icontains", &self.correspondent),
        ];
        for (key, value) in text_filters {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                query.push((key, value.to_string()));
            }
        }

        if let Some(year) = self.created_year {
            query.push(("created_year", year.to_string()));
        }
        if let Some(month) = self.created_month {
            query.push(("created__month", month.to_string()));
        }

        query
    }
}

/// Per-retriever bounds on how much is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalLimits {
    pub max_documents: usize,
    /// Maximum snippet length in characters, marker excluded.
    pub snippet_length: usize,
}

impl Default for RetrievalLimits {
    fn default() -> Self {
        Self {
            max_documents: DEFAULT_MAX_DOCUMENTS,
            snippet_length: DEFAULT_SNIPPET_LENGTH,
        }
    }
}

// =============================================================================
// Server-side shapes
// =============================================================================

/// One page of the `/api/documents/` listing.
#[derive(Debug, Deserialize)]
pub struct DocumentPage {
    #[serde(default)]
    pub results: Vec<RawDocument>,
    #[serde(default)]
    pub next: Option<String>,
}

/// A document as returned by the API. Only `id` is mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created: String,
    #[serde(default = "empty_string_value")]
    pub correspondent: Value,
    #[serde(default = "empty_string_value")]
    pub document_type: Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_string_value() -> Value {
    Value::String(String::new())
}

// =============================================================================
// Assistant-facing records
// =============================================================================

/// Lightweight preview produced by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: u64,
    pub title: String,
    pub created: String,
    pub correspondent: Value,
    pub document_type: Value,
    pub snippet: String,
    pub source: String,
}

impl DocumentSummary {
    pub fn from_raw(raw: RawDocument, snippet_length: usize, source: String) -> Self {
        Self {
            snippet: trim_content(&raw.content, snippet_length),
            id: raw.id,
            title: raw.title,
            created: raw.created,
            correspondent: raw.correspondent,
            document_type: raw.document_type,
            source,
        }
    }
}

/// Complete document with untruncated content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFull {
    pub id: u64,
    pub title: String,
    pub created: String,
    pub correspondent: Value,
    pub document_type: Value,
    pub content: String,
    pub source: String,
}

impl DocumentFull {
    pub fn from_raw(raw: RawDocument, source: String) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            created: raw.created,
            correspondent: raw.correspondent,
            document_type: raw.document_type,
            content: raw.content,
            source,
        }
    }
}

/// Result of a single-document fetch: the document, or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FullFetchOutcome {
    Found(DocumentFull),
    Failed { error: String },
}

impl FullFetchOutcome {
    pub fn document(&self) -> Option<&DocumentFull> {
        match self {
            Self::Found(doc) => Some(doc),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Found(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Cut `content` to at most `max_chars` characters, marking the cut.
pub fn trim_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &content[..cut], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}
