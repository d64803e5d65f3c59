//! Paperless tool operations: text results and status notifications.

mod common;

use serde_json::{json, Value};

use common::{
    channel_notifier, document, drain, errors, finished, page_of, FakePaperless, Fixture,
};
use paperless_mcp::config::PaperlessConfig;
use paperless_mcp::paperless::{
    DocumentFull, DocumentSummary, FilterCriteria, PaperlessTools, Status, NO_DOCUMENTS_FOUND,
};

fn tools_for(server: &FakePaperless, max_snippets: usize, snippet_length: usize) -> PaperlessTools {
    let mut config = PaperlessConfig::new(server.base_url.clone(), "secret");
    config.max_snippets = max_snippets;
    config.snippet_length = snippet_length;
    PaperlessTools::new(config)
}

#[actix_web::test]
async fn test_empty_result_is_plain_message() {
    let server = FakePaperless::start(Fixture::with_pages(vec![vec![]])).await;
    let tools = tools_for(&server, 10, 100);
    let (notifier, mut receiver) = channel_notifier();

    let text = tools
        .search_snippets(FilterCriteria::default(), notifier)
        .await;
    assert_eq!(text, NO_DOCUMENTS_FOUND);
    assert_eq!(text, "No documents found.");

    let events = drain(&mut receiver);
    let failures = errors(&events);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].description, "No documents found.");
    assert!(failures[0].done);

    assert_eq!(events[0].status, Status::InProgress);
    assert_eq!(events[0].description, "Collecting document previews...");

    server.stop().await;
}

#[actix_web::test]
async fn test_search_returns_json_list_in_order() {
    let server =
        FakePaperless::start(Fixture::with_pages(vec![page_of(1, 5), page_of(6, 5)])).await;
    let tools = tools_for(&server, 7, 8);
    let (notifier, mut receiver) = channel_notifier();

    let text = tools
        .search_snippets(
            FilterCriteria {
                tag: Some("tax".to_string()),
                ..Default::default()
            },
            notifier,
        )
        .await;

    let summaries: Vec<DocumentSummary> = serde_json::from_str(&text).unwrap();
    let ids: Vec<u64> = summaries.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    assert!(summaries.iter().all(|s| s.snippet == "content ..."));

    let events = drain(&mut receiver);
    let last = events.last().unwrap();
    assert_eq!(last.status, Status::Success);
    assert!(last.done);
    assert_eq!(
        last.description,
        "7 previews loaded. For full text, provide the document ID!"
    );
    assert!(events
        .iter()
        .any(|e| e.description == "Loaded page 2, total previewed documents: 7"));

    server.stop().await;
}

#[actix_web::test]
async fn test_search_keeps_unicode_unescaped() {
    let server = FakePaperless::start(Fixture::with_pages(vec![vec![document(
        1,
        "Grüße aus München",
    )]]))
    .await;
    let tools = tools_for(&server, 10, 100);
    let (notifier, _receiver) = channel_notifier();

    let text = tools
        .search_snippets(FilterCriteria::default(), notifier)
        .await;
    assert!(text.contains("Grüße aus München"));
    assert!(!text.contains("\\u"));

    server.stop().await;
}

#[actix_web::test]
async fn test_search_with_failing_second_page_returns_first_page() {
    let server = FakePaperless::start(
        Fixture::with_pages(vec![page_of(1, 3), page_of(4, 3)]).failing_page(2, 502),
    )
    .await;
    let tools = tools_for(&server, 10, 100);
    let (notifier, mut receiver) = channel_notifier();

    let text = tools
        .search_snippets(FilterCriteria::default(), notifier)
        .await;
    let summaries: Vec<DocumentSummary> = serde_json::from_str(&text).unwrap();
    assert_eq!(summaries.len(), 3);

    let events = drain(&mut receiver);
    let failures = errors(&events);
    assert_eq!(failures.len(), 1);
    assert!(!failures[0].done);
    assert!(failures[0].description.contains("502"));

    let done = finished(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].status, Status::Success);
    assert_eq!(events.last().unwrap().status, Status::Success);

    server.stop().await;
}

#[actix_web::test]
async fn test_failing_first_page_has_single_final_event() {
    let server =
        FakePaperless::start(Fixture::with_pages(vec![page_of(1, 3)]).failing_page(1, 500)).await;
    let tools = tools_for(&server, 10, 100);
    let (notifier, mut receiver) = channel_notifier();

    let text = tools
        .search_snippets(FilterCriteria::default(), notifier)
        .await;
    assert_eq!(text, NO_DOCUMENTS_FOUND);

    let events = drain(&mut receiver);
    let done = finished(&events);
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].status, Status::Error);
    assert_eq!(done[0].description, NO_DOCUMENTS_FOUND);
    assert!(events.last().unwrap().done);

    let failures = errors(&events);
    assert_eq!(failures.len(), 2);
    assert!(failures[0].description.starts_with("Error retrieving documents:"));
    assert!(!failures[0].done);

    server.stop().await;
}

#[actix_web::test]
async fn test_get_full_returns_whole_document() {
    let content = "x".repeat(4000);
    let server =
        FakePaperless::start(Fixture::default().with_document(document(12, &content))).await;
    let tools = tools_for(&server, 10, 5);
    let (notifier, mut receiver) = channel_notifier();

    let text = tools.get_full(12, notifier).await;
    let doc: DocumentFull = serde_json::from_str(&text).unwrap();
    assert_eq!(doc.content, content);
    assert_eq!(doc.title, "Document 12");

    let events = drain(&mut receiver);
    assert_eq!(events[0].description, "Loading full text for document 12...");
    assert!(!events[0].done);
    let last = events.last().unwrap();
    assert_eq!(last.status, Status::Success);
    assert_eq!(last.description, "Full text loaded: Document 12");

    server.stop().await;
}

#[actix_web::test]
async fn test_get_full_missing_document_returns_error_text() {
    let server = FakePaperless::start(Fixture::default()).await;
    let tools = tools_for(&server, 10, 100);
    let (notifier, mut receiver) = channel_notifier();

    let text = tools.get_full(404, notifier).await;
    assert!(text.starts_with("Error retrieving document 404:"));
    assert!(serde_json::from_str::<Value>(&text).is_err());

    let events = drain(&mut receiver);
    let failures = errors(&events);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].description, text);
    assert!(failures[0].done);

    server.stop().await;
}

#[actix_web::test]
async fn test_get_full_metadata_is_verbatim() {
    let server = FakePaperless::start(Fixture::default().with_document(json!({
        "id": 3,
        "title": "Lease",
        "correspondent": null,
        "content": "full"
    })))
    .await;
    let tools = tools_for(&server, 10, 100);
    let (notifier, _receiver) = channel_notifier();

    let value: Value = serde_json::from_str(&tools.get_full(3, notifier).await).unwrap();
    assert_eq!(value["correspondent"], Value::Null);
    assert_eq!(value["document_type"], json!(""));
    assert_eq!(value["created"], json!(""));
    assert_eq!(value["source"], json!(format!("{}/documents/3/", server.base_url)));

    server.stop().await;
}
