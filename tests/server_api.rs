//! HTTP API surface tests.
//!
//! Spin the router on an ephemeral port and exercise the validation
//! paths that answer without touching any external backend.

use blaster::config::BlasterConfig;
use blaster::server::{build_router, AppState};
use serde_json::json;

async fn spawn_server() -> String {
    let state = AppState::from_config(BlasterConfig::default()).expect("state builds");
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_answers_ok() {
    let base = spawn_server().await;
    let body: serde_json::Value = reqwest::get(format!("{base}/health"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn index_serves_the_search_form() {
    let base = spawn_server().await;
    let response = reqwest::get(&base).await.expect("request");
    assert!(response.status().is_success());
    let html = response.text().await.expect("body");
    assert!(html.contains("<form"));
    assert!(html.contains("/api/search"));
}

#[tokio::test]
async fn search_without_query_is_400() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/search"))
        .json(&json!({}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert!(body["error"].as_str().expect("error field").contains("query"));
}

#[tokio::test]
async fn search_with_blank_query_is_400() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/search"))
        .json(&json!({"query": "   "}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn search_with_six_queries_is_400() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let queries: Vec<String> = (0..6).map(|i| format!("q{i}")).collect();
    let response = client
        .post(format!("{base}/api/search"))
        .json(&json!({"queries": queries}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert!(body["error"].as_str().expect("error field").contains("at most 5"));
}

#[tokio::test]
async fn search_with_both_query_fields_is_400() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/search"))
        .json(&json!({"query": "a", "queries": ["b"]}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn crawl_get_without_query_is_400() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{base}/api/crawl")).await.expect("request");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["error"], "query is required");
}

#[tokio::test]
async fn crawl_post_with_empty_query_is_400() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base}/api/crawl"))
        .json(&json!({"query": ""}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let base = spawn_server().await;
    let response = reqwest::get(format!("{base}/api/nope")).await.expect("request");
    assert_eq!(response.status(), 404);
}
