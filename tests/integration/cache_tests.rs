//! Disk cache integration tests.
//!
//! Tests verify:
//! - Variants are produced once and replayed from disk afterwards
//! - Distinct variants get distinct cache entries
//! - The cache survives a router rebuild over the same directories
//! - Count-bound eviction keeps the cache directory within its limit

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use image_cdn::resize::ServiceOptions;

use super::test_utils::{create_test_jpeg, TestStack};

// =============================================================================
// Idempotence
// =============================================================================

#[tokio::test]
async fn test_variant_cached_after_first_request() {
    let stack = TestStack::new();
    stack.write_asset("dog.jpg", &create_test_jpeg(80, 40, 90));
    let router = stack.router();

    // First request - cache miss, variant produced and written to disk
    let request1 = Request::builder()
        .uri("/images/dog-40-20.jpg")
        .body(Body::empty())
        .unwrap();
    let response1 = router.clone().oneshot(request1).await.unwrap();
    assert_eq!(response1.status(), StatusCode::OK);
    assert_eq!(response1.headers().get("x-cache-hit").unwrap(), "false");
    let body1 = response1.into_body().collect().await.unwrap().to_bytes();

    assert_eq!(stack.cached_file_count(), 1);

    // Second request - replayed from disk, byte-identical
    let request2 = Request::builder()
        .uri("/images/dog-40-20.jpg")
        .body(Body::empty())
        .unwrap();
    let response2 = router.oneshot(request2).await.unwrap();
    assert_eq!(response2.status(), StatusCode::OK);
    assert_eq!(response2.headers().get("x-cache-hit").unwrap(), "true");
    let body2 = response2.into_body().collect().await.unwrap().to_bytes();

    assert_eq!(body1, body2);
}

#[tokio::test]
async fn test_repeated_requests_do_not_grow_cache() {
    let stack = TestStack::new();
    stack.write_asset("dog.jpg", &create_test_jpeg(80, 40, 90));
    let router = stack.router();

    for _ in 0..3 {
        let request = Request::builder()
            .uri("/images/dog-40-20.jpg")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(stack.cached_file_count(), 1);
}

#[tokio::test]
async fn test_different_dimensions_cached_separately() {
    let stack = TestStack::new();
    stack.write_asset("dog.jpg", &create_test_jpeg(100, 50, 90));
    let router = stack.router();

    for uri in ["/images/dog-100-50.jpg", "/images/dog-50-25.jpg"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-cache-hit").unwrap(), "false");
    }

    assert_eq!(stack.cached_file_count(), 2);

    // Both variants replay from disk
    for uri in ["/images/dog-100-50.jpg", "/images/dog-50-25.jpg"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-cache-hit").unwrap(), "true");
    }
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_cache_survives_router_rebuild() {
    let stack = TestStack::new();
    stack.write_asset("dog.jpg", &create_test_jpeg(60, 30, 90));

    // Produce the variant with a first router
    let router1 = stack.router();
    let request = Request::builder()
        .uri("/images/dog-30-15.jpg")
        .body(Body::empty())
        .unwrap();
    let response = router1.oneshot(request).await.unwrap();
    assert_eq!(response.headers().get("x-cache-hit").unwrap(), "false");

    // A fresh router over the same directories sees the cached variant
    let router2 = stack.router();
    let request = Request::builder()
        .uri("/images/dog-30-15.jpg")
        .body(Body::empty())
        .unwrap();
    let response = router2.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-cache-hit").unwrap(), "true");
}

// =============================================================================
// Eviction
// =============================================================================

#[tokio::test]
async fn test_eviction_bounds_cache_files() {
    let stack = TestStack::new();
    for name in ["a", "b", "c", "d", "e"] {
        stack.write_asset(&format!("{}.jpg", name), &create_test_jpeg(32, 32, 90));
    }

    let router = stack.router_with_options(ServiceOptions {
        max_cache_files: 3,
        ..Default::default()
    });

    for name in ["a", "b", "c", "d", "e"] {
        let request = Request::builder()
            .uri(format!("/images/{}-16-16.jpg", name))
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Distinct mtimes keep the oldest-first ordering unambiguous
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(stack.cached_file_count(), 3);

    // The newest variant survived the sweeps
    let request = Request::builder()
        .uri("/images/e-16-16.jpg")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.headers().get("x-cache-hit").unwrap(), "true");
}
