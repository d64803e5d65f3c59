//! Shared helpers: an in-process fake Paperless API built on actix-web.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use paperless_mcp::paperless::{ChannelNotifier, Status, StatusEvent, StatusNotifier};

/// A request seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

/// What the fake server serves.
#[derive(Default)]
pub struct Fixture {
    /// Listing pages, page 1 first.
    pub pages: Vec<Vec<Value>>,
    /// Status code override per page number.
    pub page_status: HashMap<usize, u16>,
    /// Single documents by id.
    pub documents: HashMap<u64, Value>,
    /// Delay before each listing response.
    pub delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Fixture {
    pub fn with_pages(pages: Vec<Vec<Value>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn failing_page(mut self, page: usize, status: u16) -> Self {
        self.page_status.insert(page, status);
        self
    }

    pub fn with_document(mut self, document: Value) -> Self {
        let id = document["id"].as_u64().expect("fixture document needs an id");
        self.documents.insert(id, document);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn record(&self, req: &HttpRequest) {
        let authorization = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            path: req.path().to_string(),
            query: req.query_string().to_string(),
            authorization,
        });
    }
}

pub struct FakePaperless {
    pub base_url: String,
    fixture: web::Data<Fixture>,
    handle: ServerHandle,
}

impl FakePaperless {
    pub async fn start(fixture: Fixture) -> Self {
        let fixture = web::Data::new(fixture);
        let data = fixture.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/api/documents/", web::get().to(list_documents))
                .route("/api/documents/{id}/", web::get().to(get_document))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind fake paperless");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            fixture,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.fixture.requests.lock().unwrap().clone()
    }

    pub fn listing_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == "/api/documents/")
            .collect()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn list_documents(req: HttpRequest, fixture: web::Data<Fixture>) -> HttpResponse {
    fixture.record(&req);

    if let Some(delay) = fixture.delay {
        actix_web::rt::time::sleep(delay).await;
    }

    let page = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .ok()
        .and_then(|q| q.get("page").and_then(|p| p.parse::<usize>().ok()))
        .unwrap_or(1);

    if let Some(status) = fixture.page_status.get(&page) {
        let status = actix_web::http::StatusCode::from_u16(*status).unwrap();
        return HttpResponse::build(status).json(json!({ "detail": "failure" }));
    }

    let results = fixture.pages.get(page - 1).cloned().unwrap_or_default();
    let next = if page < fixture.pages.len() {
        let host = req.connection_info().host().to_string();
        Value::String(format!("http://{host}/api/documents/?page={}", page + 1))
    } else {
        Value::Null
    };

    HttpResponse::Ok().json(json!({
        "count": fixture.pages.iter().map(Vec::len).sum::<usize>(),
        "next": next,
        "results": results,
    }))
}

async fn get_document(
    req: HttpRequest,
    path: web::Path<u64>,
    fixture: web::Data<Fixture>,
) -> HttpResponse {
    fixture.record(&req);
    match fixture.documents.get(&path.into_inner()) {
        Some(document) => HttpResponse::Ok().json(document),
        None => HttpResponse::NotFound().json(json!({ "detail": "Not found." })),
    }
}

/// A document as the Paperless API returns it.
pub fn document(id: u64, content: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Document {id}"),
        "created": "2024-03-15T00:00:00+01:00",
        "correspondent": 4,
        "document_type": 2,
        "content": content,
    })
}

/// `count` documents with consecutive ids starting at `first_id`.
pub fn page_of(first_id: u64, count: u64) -> Vec<Value> {
    (first_id..first_id + count)
        .map(|id| document(id, &format!("content of document {id}")))
        .collect()
}

pub fn channel_notifier() -> (Arc<dyn StatusNotifier>, mpsc::UnboundedReceiver<StatusEvent>) {
    let (notifier, receiver) = ChannelNotifier::new();
    (Arc::new(notifier), receiver)
}

/// Everything sent so far.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<StatusEvent>) -> Vec<StatusEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

pub fn errors(events: &[StatusEvent]) -> Vec<&StatusEvent> {
    events.iter().filter(|e| e.status == Status::Error).collect()
}

pub fn finished(events: &[StatusEvent]) -> Vec<&StatusEvent> {
    events.iter().filter(|e| e.done).collect()
}
