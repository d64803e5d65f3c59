//! Paperless-ngx document access.
//!
//! - `retriever` - paginated snippet search and single document fetch
//! - `tools` - text-returning operations for the assistant
//! - `status` - progress/success/error notifications

pub mod error;
pub mod models;
pub mod retriever;
pub mod status;
pub mod tools;

pub use error::{RetrieverError, ToolError};
pub use models::{
    DocumentFull, DocumentSummary, FilterCriteria, FullFetchOutcome, RetrievalLimits,
    TRUNCATION_MARKER,
};
pub use retriever::DocumentRetriever;
pub use status::{
    ChannelNotifier, LogNotifier, NoopNotifier, Status, StatusEmitter, StatusEvent,
    StatusNotifier,
};
pub use tools::{PaperlessTools, NO_DOCUMENTS_FOUND};
