//! HTTP surface tests using `tower::ServiceExt::oneshot`.

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use aminer_index::server::create_router;
use aminer_index::store::MemoryStore;
use aminer_index::{Config, IndexStore, IngestManifest, Ingestor, QueryService};

const EDGES: &str = "#10 20 3\n#10 30 5\n";

const AUTHORS: &str = "\
#index 10
#n Jane Smith
#a MIT
#pc 50
#cn 1000
#hi 7
#pi 12.5
#upi 10.25
#t data mining;graphs
#index 20
#n Bob Jones
#a CMU
#pc 5
#cn 20
#hi 2
#pi 1.0
#upi 0.5
#t graphs
";

async fn ingested_store(ingest: bool) -> IndexStore {
    let store = IndexStore::new(Arc::new(MemoryStore::new()));
    if ingest {
        Ingestor::new(store.clone(), &Config::for_testing())
            .run_readers(Cursor::new(EDGES), Cursor::new(AUTHORS))
            .await
            .unwrap();
    }
    store
}

async fn router(ingest: bool) -> Router {
    let store = ingested_store(ingest).await;
    create_router(QueryService::new(store, &Config::for_testing()))
}

async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(router, "GET", uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, json) = get_json(router(false).await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_requires_manifest() {
    let (status, json) = get_json(router(false).await, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "not ready");

    let (status, json) = get_json(router(true).await, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["manifest"]["authors"], 2);
    assert_eq!(json["manifest"]["state"], "complete");
}

#[tokio::test]
async fn test_not_ready_while_ingesting() {
    let store = ingested_store(true).await;
    store
        .put_manifest(&IngestManifest::in_progress())
        .await
        .unwrap();
    let router = create_router(QueryService::new(store, &Config::for_testing()));

    let (status, json) = get_json(router, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "not ready");
}

#[tokio::test]
async fn test_search_json() {
    let uri = "/search?subject=graphs&format=json";
    let (status, json) = get_json(router(true).await, uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["authors"][0]["index"], 10);
    assert_eq!(json["authors"][0]["name"], "Jane Smith");
    assert_eq!(json["authors"][1]["hIndex"], 2);
}

#[tokio::test]
async fn test_search_markdown_with_limit() {
    let request = Request::builder()
        .uri("/search?subject=data%20mining&limit=1")
        .body(Body::empty())
        .unwrap();
    let response = router(true).await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/markdown"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("[Jane Smith](/getinfo?index=10)"));
}

#[tokio::test]
async fn test_search_errors() {
    let (status, json) = get_json(router(true).await, "/search?subject=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("subject"));

    let (status, _) = get_json(router(true).await, "/search?subject=astronomy").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_getinfo_json() {
    let uri = "/getinfo?index=10&format=json";
    let (status, json) = get_json(router(true).await, uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Jane Smith");
    assert_eq!(json["coauthors"][0]["index"], 30);
    assert_eq!(json["coauthors"][0]["name"], "Unknown");
    assert_eq!(json["coauthors"][1]["name"], "Bob Jones");
}

#[tokio::test]
async fn test_getinfo_errors() {
    for uri in ["/getinfo", "/getinfo?index=", "/getinfo?index=abc", "/getinfo?index=-4"] {
        let (status, _) = send(router(true).await, "GET", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }

    let (status, _) = send(router(true).await, "GET", "/getinfo?index=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subjects_and_cache_invalidation() {
    let (status, json) = get_json(router(true).await, "/subjects").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["subjects"],
        serde_json::json!(["data mining", "graphs"])
    );

    let (status, body) = send(router(true).await, "POST", "/cache/invalidate").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("invalidated"));
}
