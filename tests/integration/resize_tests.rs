//! Resize correctness tests through the HTTP surface.
//!
//! Tests verify decoded output rather than just status codes:
//! - Exact target dimensions, ignoring the source aspect ratio
//! - Upscaling within the configured maxima
//! - Alpha flattening over a white background
//! - Grayscale sources

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use http_body_util::BodyExt;
use image::codecs::jpeg::JpegEncoder;
use tower::ServiceExt;

use super::test_utils::{create_test_jpeg, create_test_png, decoded_dimensions, TestStack};

/// Fetch a URI and return the JPEG body, asserting success along the way.
async fn fetch_jpeg(router: axum::Router, uri: &str) -> Bytes {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "GET {} should succeed", uri);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );
    response.into_body().collect().await.unwrap().to_bytes()
}

// =============================================================================
// Dimensions
// =============================================================================

#[tokio::test]
async fn test_exact_dimensions_ignore_aspect() {
    let stack = TestStack::new();
    stack.write_asset("wide.jpg", &create_test_jpeg(64, 32, 90));

    // Both dimensions are honored exactly even though 16x16 distorts 2:1
    let body = fetch_jpeg(stack.router(), "/images/wide-16-16.jpg").await;
    assert_eq!(decoded_dimensions(&body), (16, 16));
}

#[tokio::test]
async fn test_upscale_within_limits() {
    let stack = TestStack::new();
    stack.write_asset("tiny.jpg", &create_test_jpeg(10, 10, 90));

    let body = fetch_jpeg(stack.router(), "/images/tiny-100-50.jpg").await;
    assert_eq!(decoded_dimensions(&body), (100, 50));
}

// =============================================================================
// Alpha Handling
// =============================================================================

#[tokio::test]
async fn test_alpha_flattened_over_white() {
    let stack = TestStack::new();
    // Half-transparent red composites to a washed-out pink on white
    stack.write_asset("overlay.png", &create_test_png(40, 40, [200, 0, 0, 128]));

    let body = fetch_jpeg(stack.router(), "/images/overlay-20-20.png").await;

    let decoded = image::load_from_memory(&body).unwrap().into_rgb8();
    let pixel = decoded.get_pixel(10, 10);

    let expected = [227u8, 127, 127];
    for (channel, (&actual, &want)) in pixel.0.iter().zip(expected.iter()).enumerate() {
        assert!(
            (actual as i16 - want as i16).abs() <= 8,
            "channel {} should be near {}, got {}",
            channel,
            want,
            actual
        );
    }
}

#[tokio::test]
async fn test_opaque_alpha_preserves_color() {
    let stack = TestStack::new();
    stack.write_asset("solid.png", &create_test_png(40, 40, [10, 200, 30, 255]));

    let body = fetch_jpeg(stack.router(), "/images/solid-20-20.png").await;

    let decoded = image::load_from_memory(&body).unwrap().into_rgb8();
    let pixel = decoded.get_pixel(10, 10);

    let expected = [10u8, 200, 30];
    for (channel, (&actual, &want)) in pixel.0.iter().zip(expected.iter()).enumerate() {
        assert!(
            (actual as i16 - want as i16).abs() <= 10,
            "channel {} should be near {}, got {}",
            channel,
            want,
            actual
        );
    }
}

// =============================================================================
// Source Formats
// =============================================================================

#[tokio::test]
async fn test_grayscale_source() {
    let img = image::GrayImage::from_fn(60, 30, |x, _| image::Luma([(x * 4 % 256) as u8]));
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 90);
    encoder.encode_image(&img).unwrap();

    let stack = TestStack::new();
    stack.write_asset("gray.jpg", &buf);

    let body = fetch_jpeg(stack.router(), "/images/gray-30-15.jpg").await;
    assert_eq!(decoded_dimensions(&body), (30, 15));
}
