//! Paperless tool operations exposed to the assistant.
//!
//! Both operations always resolve to text. Failures are reported through the
//! status notifier and returned as the text itself.

use std::sync::Arc;

use futures::StreamExt;

use crate::config::PaperlessConfig;

use super::error::ToolError;
use super::models::{DocumentSummary, FilterCriteria, FullFetchOutcome};
use super::retriever::DocumentRetriever;
use super::status::{StatusEmitter, StatusNotifier};

pub const NO_DOCUMENTS_FOUND: &str = "No documents found.";

/// Search and full-text tools bound to one Paperless configuration.
#[derive(Debug, Clone)]
pub struct PaperlessTools {
    config: PaperlessConfig,
}

impl PaperlessTools {
    pub fn new(config: PaperlessConfig) -> Self {
        Self { config }
    }

    fn retriever(&self) -> Result<DocumentRetriever, ToolError> {
        Ok(
            DocumentRetriever::new(&self.config.base_url, self.config.token.clone())?
                .with_timeout(self.config.request_timeout),
        )
    }

    /// Search documents and return snippet previews as a JSON array.
    pub async fn search_snippets(
        &self,
        criteria: FilterCriteria,
        notifier: Arc<dyn StatusNotifier>,
    ) -> String {
        let status = StatusEmitter::new(notifier);
        match self.collect_snippets(criteria, &status).await {
            Ok(text) => text,
            Err(err) => report_failure(&status, err).await,
        }
    }

    async fn collect_snippets(
        &self,
        criteria: FilterCriteria,
        status: &StatusEmitter,
    ) -> Result<String, ToolError> {
        status.progress_update("Collecting document previews...").await;

        let retriever = self
            .retriever()?
            .with_filters(criteria)
            .with_limits(self.config.limits())
            .with_notifier(status.notifier());

        let results: Vec<DocumentSummary> = retriever.search()?.collect().await;

        if results.is_empty() {
            status.error_update(NO_DOCUMENTS_FOUND).await;
            return Ok(NO_DOCUMENTS_FOUND.to_string());
        }

        status
            .success_update(format!(
                "{} previews loaded. For full text, provide the document ID!",
                results.len()
            ))
            .await;

        Ok(serde_json::to_string(&results)?)
    }

    /// Load the full text of one document and return it as a JSON object.
    pub async fn get_full(&self, document_id: u64, notifier: Arc<dyn StatusNotifier>) -> String {
        let status = StatusEmitter::new(notifier);
        match self.load_full(document_id, &status).await {
            Ok(text) => text,
            Err(err) => report_failure(&status, err).await,
        }
    }

    async fn load_full(&self, document_id: u64, status: &StatusEmitter) -> Result<String, ToolError> {
        status
            .progress_update(format!("Loading full text for document {document_id}..."))
            .await;

        let outcome = self.retriever()?.fetch_full(document_id).await;

        match outcome {
            FullFetchOutcome::Found(document) => {
                status
                    .success_update(format!("Full text loaded: {}", document.title))
                    .await;
                Ok(serde_json::to_string(&document)?)
            }
            FullFetchOutcome::Failed { error } => {
                let message = if error.is_empty() {
                    format!("No document found for ID {document_id}")
                } else {
                    error
                };
                status.error_update(message.as_str()).await;
                Ok(message)
            }
        }
    }
}

async fn report_failure(status: &StatusEmitter, err: ToolError) -> String {
    log::error!("paperless tool failed: {}", err);
    let message = format!("Error: {err}");
    status.error_update(message.as_str()).await;
    message
}
