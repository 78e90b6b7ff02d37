//! Live server tests over real TCP.
//!
//! These tests bind the full router to an ephemeral port, run it as a
//! background task, and exercise it with a real HTTP client so the whole
//! hyper/axum stack is covered.

use image_cdn::server::create_default_router;

use super::test_utils::{create_test_jpeg, decoded_dimensions, TestStack};

/// Bind the router to an ephemeral port and serve it in the background.
///
/// Returns the base URL of the running server. The task is dropped with the
/// test's runtime.
async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    format!("http://{}", addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_live_health() {
    let stack = TestStack::new();
    let base = spawn_server(stack.router()).await;

    let response = reqwest::get(format!("{}/health", base))
        .await
        .expect("request health");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let health: serde_json::Value = response.json().await.expect("parse health body");
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["assets_exists"], true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_live_resize_roundtrip() {
    let stack = TestStack::new();
    stack.write_asset("photos/dog.jpg", &create_test_jpeg(80, 40, 90));
    let base = spawn_server(stack.router()).await;

    let url = format!("{}/images/photos/dog-40-20.jpg", base);

    // First fetch produces the variant
    let first = reqwest::get(&url).await.expect("first request");
    assert_eq!(first.status(), reqwest::StatusCode::OK);
    assert_eq!(first.headers().get("x-cache-hit").unwrap(), "false");
    assert_eq!(
        first.headers().get("x-original-image").unwrap(),
        "photos/dog.jpg"
    );
    let body = first.bytes().await.expect("read body");
    assert_eq!(decoded_dimensions(&body), (40, 20));

    // Second fetch replays it from disk
    let second = reqwest::get(&url).await.expect("second request");
    assert_eq!(second.status(), reqwest::StatusCode::OK);
    assert_eq!(second.headers().get("x-cache-hit").unwrap(), "true");
    assert_eq!(second.bytes().await.expect("read body"), body);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_live_not_found_json() {
    let stack = TestStack::new();
    let base = spawn_server(create_default_router(stack.service())).await;

    let response = reqwest::get(format!("{}/images/ghost-10-10.jpg", base))
        .await
        .expect("request missing variant");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let error: serde_json::Value = response.json().await.expect("parse error body");
    assert_eq!(error["error"], "not_found");
    assert_eq!(error["status"], 404);
}
