use thiserror::Error;

/// Errors raised while talking to the Paperless API.
#[derive(Debug, Error)]
pub enum RetrieverError {
    #[error("invalid Paperless base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Errors raised by the Paperless tool operations before being turned into text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Retriever(#[from] RetrieverError),
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}
