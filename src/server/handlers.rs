//! HTTP request handlers for the image API.
//!
//! This module contains the Axum handlers for serving original assets,
//! resized variants, and health checks.
//!
//! # Endpoints
//!
//! - `GET /images/{path}` - Serve an asset, resizing when the filename asks for it
//! - `GET /health` - Health check endpoint
//! - `GET /` - Service description

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::assets::{parse_request_path, AssetRequest};
use crate::cache::CacheStore;
use crate::error::ImageError;
use crate::resize::{ImageService, DEFAULT_JPEG_QUALITY};

/// Cache-Control for successful image responses. Served files never change
/// under a given path, so clients may cache them for a year.
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the image service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<C: CacheStore> {
    /// The image service for processing asset and resize requests
    pub image_service: Arc<ImageService<C>>,

    /// JPEG quality applied to variants requested over HTTP
    pub default_quality: u8,

    /// Cache directory path, reported by the health endpoint
    pub cache_dir: String,
}

impl<C: CacheStore> AppState<C> {
    /// Create a new application state with the given image service.
    pub fn new(image_service: ImageService<C>) -> Self {
        Self {
            image_service: Arc::new(image_service),
            default_quality: DEFAULT_JPEG_QUALITY,
            cache_dir: String::new(),
        }
    }

    /// Set the JPEG quality used for variants requested over HTTP.
    pub fn with_default_quality(mut self, quality: u8) -> Self {
        self.default_quality = quality;
        self
    }

    /// Set the cache directory path reported by the health endpoint.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<String>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }
}

impl<C: CacheStore> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            image_service: Arc::clone(&self.image_service),
            default_quality: self.default_quality,
            cache_dir: self.cache_dir.clone(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "dimensions_too_large")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Configured assets directory
    pub assets_dir: String,

    /// Whether the assets directory exists on disk
    pub assets_exists: bool,

    /// Configured cache directory
    pub cache_dir: String,
}

/// Service description returned from the root endpoint.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    /// Service name
    pub service: String,

    /// Service version
    pub version: String,

    /// Available endpoints
    pub endpoints: Vec<String>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ImageError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 4xx errors are logged at WARN level (client errors)
/// - 404s are logged at DEBUG level (common and expected)
/// - 5xx errors are logged at ERROR level (server errors)
impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            // 404 Not Found
            ImageError::NotFound { path } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Image not found: {}", path),
            ),

            // 400 Bad Request - Invalid parameters
            ImageError::WidthTooLarge { requested, max } => (
                StatusCode::BAD_REQUEST,
                "dimensions_too_large",
                format!("Requested width {} exceeds the maximum of {}", requested, max),
            ),

            ImageError::HeightTooLarge { requested, max } => (
                StatusCode::BAD_REQUEST,
                "dimensions_too_large",
                format!(
                    "Requested height {} exceeds the maximum of {}",
                    requested, max
                ),
            ),

            ImageError::InvalidQuality { quality } => (
                StatusCode::BAD_REQUEST,
                "invalid_quality",
                format!("Invalid quality: {} (must be 1-100)", quality),
            ),

            // 500 Internal Server Error - processing and I/O errors
            ImageError::DecodeError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "decode_error",
                format!("Failed to decode image: {}", message),
            ),

            ImageError::EncodeError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encode_error",
                format!("Failed to encode image: {}", message),
            ),

            ImageError::Cache(cache_err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "cache_io_error",
                format!("Cache error: {}", cache_err),
            ),

            ImageError::AssetIo(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "asset_io_error",
                format!("Asset I/O error: {}", message),
            ),
        };

        // Log errors based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status.is_client_error() {
            // Log 404s at debug level (common and expected), others at warn
            if status == StatusCode::NOT_FOUND {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Resource not found: {}",
                    message
                );
            } else {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Client error: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image requests.
///
/// # Endpoint
///
/// `GET /images/{path}`
///
/// The path is matched against the resize filename protocol
/// (`<base>-<width>-<height>.<ext>` with ext jpg/jpeg/png, case-insensitive).
/// On a match, the original `<base>.<ext>` is resized to the requested
/// dimensions and returned as JPEG; otherwise the path is served as a plain
/// file from the assets directory.
///
/// # Response
///
/// - `200 OK`: Image bytes
/// - `400 Bad Request`: Requested dimensions exceed the configured maxima
/// - `404 Not Found`: Asset missing or outside the assets directory
/// - `500 Internal Server Error`: Decode, encode, or cache failure
///
/// # Headers
///
/// - `Content-Type`: `image/jpeg` for variants, inferred from the extension
///   for plain assets
/// - `Cache-Control: public, max-age=31536000, immutable`
/// - `X-Original-Image`: original asset path (variants only)
/// - `X-Cache-Hit: true|false` (variants only)
pub async fn image_handler<C: CacheStore>(
    State(state): State<AppState<C>>,
    Path(path): Path<String>,
) -> Result<Response, ImageError> {
    match parse_request_path(&path) {
        AssetRequest::Resize(mut request) => {
            request.quality = state.default_quality;
            let original_path = request.original_path();

            let outcome = state.image_service.resize_image(request).await?;

            let mut builder = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "image/jpeg")
                .header(header::CACHE_CONTROL, IMMUTABLE_CACHE_CONTROL)
                .header("X-Cache-Hit", outcome.cache_hit.to_string());

            // Asset paths are not guaranteed to be valid header text
            if let Ok(value) = header::HeaderValue::from_str(&original_path) {
                builder = builder.header("X-Original-Image", value);
            }

            let response = builder
                .body(axum::body::Body::from(outcome.data))
                .unwrap();

            Ok(response)
        }

        AssetRequest::Plain(asset_path) => {
            let data = state.image_service.plain_asset(&asset_path).await?;

            let response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type_for(&asset_path))
                .header(header::CACHE_CONTROL, IMMUTABLE_CACHE_CONTROL)
                .body(axum::body::Body::from(data))
                .unwrap();

            Ok(response)
        }
    }
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "assets_dir": "/srv/assets",
///   "assets_exists": true,
///   "cache_dir": "/tmp/image_cache"
/// }
/// ```
pub async fn health_handler<C: CacheStore>(
    State(state): State<AppState<C>>,
) -> Json<HealthResponse> {
    let assets = state.image_service.assets();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        assets_dir: assets.root().display().to_string(),
        assets_exists: assets.root_exists().await,
        cache_dir: state.cache_dir.clone(),
    })
}

/// Handle root requests with a short service description.
///
/// # Endpoint
///
/// `GET /`
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec!["/images/{path}".to_string(), "/health".to_string()],
    })
}

// =============================================================================
// Content Types
// =============================================================================

/// Infer a Content-Type from a file extension.
///
/// Plain assets are served straight from disk; anything unrecognized falls
/// back to `application/octet-stream`.
fn content_type_for(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Tests
// =============================================================================
