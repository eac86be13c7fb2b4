//! Integration Tests for the HTTP Catalog Source
//!
//! Runs a local upstream product endpoint and checks fetching, error
//! classification and end-to-end request deduplication.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use catalog_cache::catalog::{CatalogSource, HttpCatalogSource, ListOptions, SystemClock};
use catalog_cache::{CatalogCache, CatalogError};
use chrono::Duration;
use serde_json::json;

#[derive(Clone)]
struct Upstream {
    hits: Arc<AtomicUsize>,
    status: StatusCode,
    body: String,
    delay: StdDuration,
}

async fn products(State(upstream): State<Upstream>) -> impl IntoResponse {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(upstream.delay).await;
    (
        upstream.status,
        [("content-type", "application/json")],
        upstream.body.clone(),
    )
}

fn product_list() -> String {
    json!([
        {"id": "1", "name": "Phone", "image": "/img/1.jpg", "price": 599.0,
         "category": "Electronics", "stockCount": 4, "rating": 4.5, "reviewCount": 10},
        {"id": "2", "name": "Shirt", "image": "/img/2.jpg", "price": 19.0,
         "category": "Apparel", "stockCount": 0, "rating": 3.0, "reviewCount": 2}
    ])
    .to_string()
}

/// Starts an upstream on an ephemeral port and returns its products URL.
async fn spawn_upstream(status: StatusCode, body: String, delay: StdDuration) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = Upstream {
        hits: hits.clone(),
        status,
        body,
        delay,
    };
    let app = Router::new()
        .route("/api/products", get(products))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/products", addr), hits)
}

fn source(url: &str) -> HttpCatalogSource {
    HttpCatalogSource::new(url, StdDuration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_product_list() {
    let (url, hits) = spawn_upstream(StatusCode::OK, product_list(), StdDuration::ZERO).await;

    let products = source(&url).fetch_product_list().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Phone");
    assert_eq!(products[0].stock_count, 4);
    assert_eq!(products[1].review_count, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_not_found_classification() {
    let (url, _) = spawn_upstream(StatusCode::NOT_FOUND, "missing".into(), StdDuration::ZERO).await;

    let result = source(&url).fetch_product_list().await;

    assert_eq!(result, Err(CatalogError::NotFound("missing".into())));
}

#[tokio::test]
async fn test_forbidden_classification() {
    let (url, _) = spawn_upstream(StatusCode::UNAUTHORIZED, String::new(), StdDuration::ZERO).await;

    let result = source(&url).fetch_product_list().await;

    assert_eq!(result, Err(CatalogError::Forbidden("Unauthorized".into())));
}

#[tokio::test]
async fn test_server_failure_classification() {
    let (url, _) = spawn_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        "database down".into(),
        StdDuration::ZERO,
    )
    .await;

    let result = source(&url).fetch_product_list().await;

    assert_eq!(result, Err(CatalogError::ServerFailure("database down".into())));
}

#[tokio::test]
async fn test_malformed_body_is_server_failure() {
    let (url, _) = spawn_upstream(StatusCode::OK, r#"{"not":"a list"}"#.into(), StdDuration::ZERO).await;

    let result = source(&url).fetch_product_list().await;

    assert!(matches!(result, Err(CatalogError::ServerFailure(_))));
}

#[tokio::test]
async fn test_timeout_is_network_unavailable() {
    let (url, _) = spawn_upstream(StatusCode::OK, product_list(), StdDuration::from_secs(2)).await;
    let source = HttpCatalogSource::new(&url, StdDuration::from_millis(200)).unwrap();

    let result = source.fetch_product_list().await;

    assert!(matches!(result, Err(CatalogError::NetworkUnavailable(_))));
}

#[tokio::test]
async fn test_concurrent_reads_hit_upstream_once() {
    let (url, hits) =
        spawn_upstream(StatusCode::OK, product_list(), StdDuration::from_millis(200)).await;
    let cache = CatalogCache::new(
        Arc::new(source(&url)),
        Arc::new(SystemClock),
        Duration::minutes(5),
        Duration::seconds(30),
    );

    let reads: Vec<_> = (0..5)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.list_products(ListOptions::default()).await })
        })
        .collect();

    let mut results = Vec::new();
    for read in reads {
        results.push(read.await.unwrap().unwrap());
    }

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| r.products.len() == 2));
    assert!(results.iter().all(|r| r == &results[0]));
}
