//! # Image CDN
//!
//! An HTTP server for static image assets with on-demand resizing.
//!
//! This library serves original image assets from a local directory and
//! produces resized JPEG variants on the fly. Variants are requested through
//! the filename itself, cached on disk, and served with long-lived cache
//! headers so a CDN or browser rarely asks twice.
//!
//! ## Features
//!
//! - **Filename protocol**: `GET /images/photo-300-200.jpg` serves `photo.jpg`
//!   resized to 300x200
//! - **Aspect-preserving resizing**: library callers may omit one dimension
//!   and the other follows from the source aspect ratio
//! - **Disk-backed variant cache**: resized variants live as flat files,
//!   bounded by entry count with oldest-first eviction
//! - **Request coalescing**: concurrent misses for the same variant run the
//!   decode/resize/encode work once
//! - **Alpha flattening**: transparent sources are composited over white
//!   before JPEG encoding
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`assets`] - Request path parsing and root-contained asset reads
//! - [`resize`] - Image decoding, resizing, and the caching image service
//! - [`cache`] - On-disk variant cache with count-bound eviction
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types shared across the crate
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_cdn::assets::AssetStore;
//! use image_cdn::cache::DiskCache;
//! use image_cdn::resize::ImageService;
//! use image_cdn::server::{create_router, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Serve originals from /srv/assets, cache variants in /tmp/image_cache
//!     let service = ImageService::new(
//!         AssetStore::new("/srv/assets"),
//!         DiskCache::new("/tmp/image_cache"),
//!     );
//!
//!     let router = create_router(service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8001").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod resize;
pub mod server;

// Re-export commonly used types
pub use assets::{parse_request_path, AssetRequest, AssetStore, ResizeRequest};
pub use cache::{CacheEntry, CacheEvictor, CacheStore, DiskCache, DEFAULT_MAX_CACHE_FILES};
pub use config::Config;
pub use error::{CacheError, ImageError};
pub use resize::{
    clamp_dimensions, clamp_quality, derive_cache_key, is_valid_quality, resolve_target,
    validate_dimensions, ImageInfo, ImageService, ImageTransformer, ResizeOutcome, ServiceOptions,
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY,
};
pub use server::{
    create_default_router, create_router, health_handler, image_handler, root_handler, AppState,
    ErrorResponse, HealthResponse, RootResponse, RouterConfig,
};
