//! Resize pipeline layer.
//!
//! This module produces resized JPEG variants of original assets and keeps
//! them in a count-bounded disk cache.
//!
//! # Architecture
//!
//! The pipeline sits between the HTTP layer and the asset/cache stores:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              ImageService               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  limits/key  │  │   Transformer   │  │
//! │  │  (validate,  │  │  (decode →      │  │
//! │  │   derive)    │  │   flatten →     │  │
//! │  │              │  │   resize →      │  │
//! │  │              │  │   encode)       │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └──────────┬──────────────────┬───────────┘
//!            │                  │
//!            ▼                  ▼
//! ┌───────────────────┐  ┌───────────────────┐
//! │    AssetStore     │  │    CacheStore     │
//! └───────────────────┘  └───────────────────┘
//! ```
//!
//! # Components
//!
//! - [`ImageService`]: Main entry point for resize requests, orchestrates the full pipeline
//! - [`ImageTransformer`]: Decodes sources, flattens alpha onto white, resizes, encodes JPEG
//! - [`derive_cache_key`]: Maps a `(stem, width, height, quality)` tuple to a cache filename
//! - [`validate_dimensions`] / [`clamp_dimensions`]: The configured dimension policy
//! - [`ResizeOutcome`]: Response carrying the variant bytes and cache-hit flag
//!
//! # Example
//!
//! ```
//! use image_cdn::resize::{derive_cache_key, resolve_target};
//!
//! // Height follows the aspect ratio when only width is requested
//! assert_eq!(resolve_target((400, 200), Some(200), None), Some((200, 100)));
//!
//! // The key doubles as the variant's cache filename
//! let key = derive_cache_key("dog", Some(200), None, 85);
//! assert!(key.ends_with(".jpg"));
//! ```

mod key;
mod limits;
mod service;
mod transform;

pub use key::derive_cache_key;
pub use limits::{
    clamp_dimensions, clamp_quality, is_valid_quality, resolve_target, validate_dimensions,
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY,
};
pub use service::{ImageService, ResizeOutcome, ServiceOptions};
pub use transform::{ImageInfo, ImageTransformer};
