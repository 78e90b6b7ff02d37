//! Router configuration for the image service.
//!
//! This module defines the HTTP routes and applies middleware for CORS and
//! request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                  - Service description
//! /health            - Health check
//! /images/{*path}    - Asset endpoint (plain files and resized variants)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use image_cdn::assets::AssetStore;
//! use image_cdn::cache::DiskCache;
//! use image_cdn::resize::ImageService;
//! use image_cdn::server::routes::{create_router, RouterConfig};
//!
//! // Create the image service
//! let service = ImageService::new(
//!     AssetStore::new("/srv/assets"),
//!     DiskCache::new("/tmp/image_cache"),
//! );
//!
//! // Configure and create router
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(service, config);
//!
//! // Run the server
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8001").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, image_handler, root_handler, AppState};
use crate::cache::CacheStore;
use crate::resize::{ImageService, DEFAULT_JPEG_QUALITY};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// JPEG quality applied to resized variants
    pub default_quality: u8,

    /// Cache directory path, reported by the health endpoint
    pub cache_dir: String,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Variants are encoded at the default JPEG quality
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None, // Allow any origin by default
            default_quality: DEFAULT_JPEG_QUALITY,
            cache_dir: String::new(),
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the JPEG quality applied to resized variants.
    pub fn with_default_quality(mut self, quality: u8) -> Self {
        self.default_quality = quality;
        self
    }

    /// Set the cache directory path reported by the health endpoint.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<String>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - The asset endpoint (plain files and resized variants)
/// - Health check and service description routes
/// - CORS configuration
/// - Request tracing (optional)
///
/// # Arguments
///
/// * `image_service` - The image service for handling asset requests
/// * `config` - Router configuration
///
/// # Returns
///
/// A configured Axum router ready to be served.
pub fn create_router<C>(image_service: ImageService<C>, config: RouterConfig) -> Router
where
    C: CacheStore + 'static,
{
    // Create application state
    let app_state = AppState::new(image_service)
        .with_default_quality(config.default_quality)
        .with_cache_dir(config.cache_dir.clone());

    // Build CORS layer
    let cors = build_cors_layer(&config);

    // Build the router
    // Uses {*path} so nested asset paths like "photos/cats/tabby.jpg" resolve
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler::<C>))
        .route("/images/{*path}", get(image_handler::<C>))
        .with_state(app_state)
        .layer(cors);

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // preflight results last a day

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // Empty list: no origin is allowed, cross-origin requests fail
            cors
        }
        Some(origins) => {
            // Origins that fail to parse as header values are dropped
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Create a router with default settings.
///
/// Uses the defaults from [`RouterConfig::new`]: any CORS origin, the default
/// JPEG quality, and tracing enabled.
pub fn create_default_router<C>(image_service: ImageService<C>) -> Router
where
    C: CacheStore + 'static,
{
    create_router(image_service, RouterConfig::new())
}

// =============================================================================
// Tests
// =============================================================================
