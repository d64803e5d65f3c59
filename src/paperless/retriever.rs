//! Paperless document retriever.
//!
//! `search()` walks the paginated `/api/documents/` listing lazily: each
//! summary is handed out as soon as it is built, and the next page is only
//! requested once the current one has been consumed. `fetch_full()` loads a
//! single document by id.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};

use super::error::RetrieverError;
use super::models::{
    DocumentFull, DocumentPage, DocumentSummary, FilterCriteria, FullFetchOutcome, RawDocument,
    RetrievalLimits,
};
use super::status::{StatusEmitter, StatusNotifier};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for one Paperless instance, configured with filters and limits.
#[derive(Debug, Clone)]
pub struct DocumentRetriever {
    documents_url: String,
    source_base: String,
    token: String,
    filters: FilterCriteria,
    limits: RetrievalLimits,
    timeout: Duration,
    status: StatusEmitter,
}

impl DocumentRetriever {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, RetrieverError> {
        let base = base_url.trim().trim_end_matches('/');
        Url::parse(base).map_err(|err| RetrieverError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            documents_url: format!("{base}/api/documents/"),
            source_base: format!("{base}/documents/"),
            token: token.into(),
            filters: FilterCriteria::default(),
            limits: RetrievalLimits::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            status: StatusEmitter::silent(),
        })
    }

    pub fn with_filters(mut self, filters: FilterCriteria) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limits(mut self, limits: RetrievalLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route page progress and fetch errors to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn StatusNotifier>) -> Self {
        self.status = StatusEmitter::new(notifier);
        self
    }

    /// The listing endpoint, e.g. `https://host/api/documents/`.
    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    /// Link to the document in the Paperless web UI.
    pub fn source_url(&self, document_id: u64) -> String {
        format!("{}{}/", self.source_base, document_id)
    }

    fn http_client(&self) -> Result<Client, RetrieverError> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RetrieverError::Client)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Stream of document summaries matching the filters.
    ///
    /// Ends when the server has no further page or `max_documents` summaries
    /// were produced. A failing page ends the stream after reporting the error
    /// through the notifier as a non-final update; summaries already produced
    /// stay valid.
    pub fn search(&self) -> Result<BoxStream<'static, DocumentSummary>, RetrieverError> {
        let pager = Pager {
            client: self.http_client()?,
            auth: self.auth_header(),
            pending: Some(PageRequest::First {
                url: self.documents_url.clone(),
                query: self.filters.to_query(),
            }),
            buffered: VecDeque::new(),
            page_open: false,
            pages: 0,
            yielded: 0,
            limits: self.limits,
            source_base: self.source_base.clone(),
            status: self.status.clone(),
        };

        let summaries = stream::unfold(pager, |mut pager| async move {
            pager.advance().await.map(|summary| (summary, pager))
        });

        Ok(summaries.fuse().boxed())
    }

    /// Load one document with its full content.
    ///
    /// Never fails: problems come back as `FullFetchOutcome::Failed`.
    pub async fn fetch_full(&self, document_id: u64) -> FullFetchOutcome {
        match self.try_fetch_full(document_id).await {
            Ok(document) => FullFetchOutcome::Found(document),
            Err(err) => {
                warn!("failed to fetch document {}: {}", document_id, err);
                FullFetchOutcome::Failed {
                    error: format!("Error retrieving document {document_id}: {err}"),
                }
            }
        }
    }

    async fn try_fetch_full(&self, document_id: u64) -> Result<DocumentFull, RetrieverError> {
        let client = self.http_client()?;
        let url = format!("{}{}/", self.documents_url, document_id);
        debug!("fetching document {}", url);

        let raw: RawDocument = client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let source = self.source_url(raw.id);
        Ok(DocumentFull::from_raw(raw, source))
    }
}

// =============================================================================
// Pagination state
// =============================================================================

enum PageRequest {
    /// Listing endpoint plus the filter query.
    First {
        url: String,
        query: Vec<(&'static str, String)>,
    },
    /// Server-supplied `next` link, used verbatim.
    Follow(String),
}

impl PageRequest {
    fn url(&self) -> &str {
        match self {
            Self::First { url, .. } | Self::Follow(url) => url,
        }
    }
}

struct Pager {
    client: Client,
    auth: String,
    pending: Option<PageRequest>,
    buffered: VecDeque<RawDocument>,
    /// A page was fetched and its progress update is still owed.
    page_open: bool,
    pages: usize,
    yielded: usize,
    limits: RetrievalLimits,
    source_base: String,
    status: StatusEmitter,
}

impl Pager {
    async fn advance(&mut self) -> Option<DocumentSummary> {
        loop {
            if self.yielded < self.limits.max_documents {
                if let Some(raw) = self.buffered.pop_front() {
                    self.yielded += 1;
                    return Some(self.summarize(raw));
                }
            }

            if self.page_open {
                self.page_open = false;
                self.buffered.clear();
                self.status
                    .progress_update(format!(
                        "Loaded page {}, total previewed documents: {}",
                        self.pages, self.yielded
                    ))
                    .await;
            }

            if self.yielded >= self.limits.max_documents {
                return None;
            }

            let request = self.pending.take()?;
            match self.fetch_page(&request).await {
                Ok(page) => {
                    self.pages += 1;
                    self.buffered = page.results.into();
                    self.pending = page
                        .next
                        .filter(|next| !next.is_empty())
                        .map(PageRequest::Follow);
                    self.page_open = true;
                }
                Err(err) => {
                    warn!("document page request to {} failed: {}", request.url(), err);
                    self.status
                        .interim_error_update(format!("Error retrieving documents: {err}"))
                        .await;
                    return None;
                }
            }
        }
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<DocumentPage, RetrieverError> {
        debug!("fetching document page {}", request.url());

        let builder = match request {
            PageRequest::First { url, query } if !query.is_empty() => {
                self.client.get(url).query(query)
            }
            PageRequest::First { url, .. } | PageRequest::Follow(url) => self.client.get(url),
        };

        let page = builder
            .header(AUTHORIZATION, &self.auth)
            .send()
            .await?
            .error_for_status()?
            .json::<DocumentPage>()
            .await?;

        Ok(page)
    }

    fn summarize(&self, raw: RawDocument) -> DocumentSummary {
        let source = format!("{}{}/", self.source_base, raw.id);
        DocumentSummary::from_raw(raw, self.limits.snippet_length, source)
    }
}
