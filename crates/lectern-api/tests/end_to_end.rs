//! Ingest a content tree into the mock store, then search it through the
//! gateway router.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use lectern_api::{router, GatewayState};
use lectern_ingest::{IngestOptions, Ingestor};
use lectern_vector::{MockVectorStore, SearchConfig};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

async fn get_json(state: GatewayState, uri: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn ingested_pages_are_searchable() {
    let content = TempDir::new().unwrap();
    fs::write(
        content.path().join("guide.md"),
        "---\ntitle: \"Guide\"\npath: /guide\nsource_url: /docs/guide\n---\n# Guide\n",
    )
    .unwrap();
    fs::create_dir_all(content.path().join("reference")).unwrap();
    fs::write(
        content.path().join("reference/untitled.md"),
        "Plain page without frontmatter.",
    )
    .unwrap();

    let store = MockVectorStore::new();
    let report = Ingestor::new(store.clone(), "vs_docs", IngestOptions::new(content.path()))
        .run()
        .await
        .unwrap();
    assert_eq!(report.uploaded, 2);

    let state = GatewayState::new(SearchConfig::default())
        .with_store(Arc::new(store))
        .with_vector_store_id("vs_docs");
    let (status, body) = get_json(state, "/api/vector-store?query=guide").await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 4);

    // Upload order is path order: guide.md before reference/untitled.md.
    assert_eq!(items[0]["type"], "page");
    assert_eq!(items[0]["content"], "Guide");
    assert_eq!(items[0]["url"], "/docs/guide");
    assert_eq!(items[1]["type"], "text");
    assert_eq!(items[1]["content"], "/guide");
    assert_eq!(items[1]["url"], items[0]["url"]);

    assert_eq!(items[2]["content"], "Untitled");
    assert_eq!(items[2]["url"], "#");
    assert_eq!(items[3]["content"], "Plain page without frontmatter.");
}

#[tokio::test]
async fn dialog_binding_matches_gateway_path() {
    let (status, body) = get_json(
        GatewayState::new(SearchConfig::default()),
        "/api/search-dialog",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api"], "/api/vector-store");
    assert_eq!(body["delayMs"], 200);
}
