//! Image service orchestrating the resize pipeline.
//!
//! The ImageService is the main entry point for resize requests. It
//! orchestrates:
//! - Request validation
//! - Cache key derivation and cache lookups
//! - Original asset reads
//! - Decoding, normalization, and JPEG re-encoding
//! - Cache writes and the post-write eviction sweep
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ImageService                          │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                    resize_image()                      │  │
//! │  │  1. Validate quality    4. Read original asset         │  │
//! │  │  2. Clamp dimensions    5. Transform to JPEG           │  │
//! │  │  3. Check disk cache    6. Write cache & sweep         │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │         │                    │                   │           │
//! │         ▼                    ▼                   ▼           │
//! │   ┌────────────┐      ┌────────────┐   ┌──────────────────┐  │
//! │   │ CacheStore │      │ AssetStore │   │ ImageTransformer │  │
//! │   └────────────┘      └────────────┘   └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent misses for the same cache key are deduplicated: the first
//! request produces the variant while the rest wait and share its result.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, Notify};
use tracing::debug;

use crate::assets::{AssetStore, ResizeRequest};
use crate::cache::{CacheEvictor, CacheStore, DEFAULT_MAX_CACHE_FILES};
use crate::error::ImageError;

use super::key::derive_cache_key;
use super::limits::{
    clamp_dimensions, is_valid_quality, validate_dimensions, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH,
};
use super::transform::{ImageInfo, ImageTransformer};

// =============================================================================
// Service Options
// =============================================================================

/// Tunable limits for the image service.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Maximum accepted output width in pixels.
    pub max_width: u32,

    /// Maximum accepted output height in pixels.
    pub max_height: u32,

    /// Maximum number of cached variant files kept on disk.
    pub max_cache_files: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            max_cache_files: DEFAULT_MAX_CACHE_FILES,
        }
    }
}

// =============================================================================
// Resize Outcome
// =============================================================================

/// Result of a resize request.
#[derive(Debug, Clone)]
pub struct ResizeOutcome {
    /// The encoded JPEG variant
    pub data: Bytes,

    /// Whether the variant came from the disk cache
    pub cache_hit: bool,

    /// The JPEG quality used for encoding
    pub quality: u8,
}

/// State for an in-flight variant production.
struct InFlightState {
    /// Notification for waiters
    notify: Notify,
    /// Result of the production (set when complete)
    result: Mutex<Option<Result<Bytes, ImageError>>>,
}

// =============================================================================
// Image Service
// =============================================================================

/// Service for producing and caching resized image variants.
///
/// The ImageService orchestrates the full resize pipeline:
/// 1. Validates quality and requested dimensions
/// 2. Derives the cache key and checks the disk cache
/// 3. On a miss, reads the original from the assets directory
/// 4. Decodes, flattens alpha onto white, resizes, re-encodes as JPEG
/// 5. Writes the variant to the cache and sweeps it back under its bound
///
/// # Type Parameters
///
/// * `C` - The cache store backing variant storage (disk in production)
///
/// # Example
///
/// ```ignore
/// use image_cdn::assets::{AssetStore, ResizeRequest};
/// use image_cdn::cache::DiskCache;
/// use image_cdn::resize::ImageService;
///
/// let service = ImageService::new(
///     AssetStore::new("/srv/assets"),
///     DiskCache::new("/tmp/image_cache"),
/// );
///
/// let request = ResizeRequest::new("photos", "dog", "jpg", Some(300), Some(200));
/// let outcome = service.resize_image(request).await?;
///
/// println!("{} bytes, cache hit: {}", outcome.data.len(), outcome.cache_hit);
/// ```
pub struct ImageService<C: CacheStore> {
    /// Store for original assets
    assets: AssetStore,

    /// Cache for produced variants
    cache: C,

    /// Count-bound enforcement for the cache
    evictor: CacheEvictor,

    /// Decoder/encoder pipeline
    transformer: ImageTransformer,

    /// In-flight productions, for deduplicating concurrent misses
    in_flight: Mutex<HashMap<String, Arc<InFlightState>>>,

    /// Configured limits
    options: ServiceOptions,
}

impl<C: CacheStore> ImageService<C> {
    /// Create a new image service with default limits.
    pub fn new(assets: AssetStore, cache: C) -> Self {
        Self::with_options(assets, cache, ServiceOptions::default())
    }

    /// Create a new image service with explicit limits.
    pub fn with_options(assets: AssetStore, cache: C, options: ServiceOptions) -> Self {
        Self {
            assets,
            cache,
            evictor: CacheEvictor::new(options.max_cache_files),
            transformer: ImageTransformer::new(),
            in_flight: Mutex::new(HashMap::new()),
            options,
        }
    }

    /// Produce a resized JPEG variant, using the cache when possible.
    ///
    /// This is the main entry point for resize requests. It:
    /// 1. Validates the request parameters against the configured limits
    /// 2. Checks the cache for an existing variant
    /// 3. If not cached, reads the original, transforms, and caches it
    /// 4. Deduplicates concurrent productions of the same variant
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The quality is outside 1-100
    /// - A requested dimension exceeds the configured maximum
    /// - The original asset does not exist under the assets directory
    /// - The original cannot be decoded, or the variant cannot be encoded
    /// - The cache cannot be read or written
    pub async fn resize_image(&self, request: ResizeRequest) -> Result<ResizeOutcome, ImageError> {
        // Validate quality
        if !is_valid_quality(request.quality) {
            return Err(ImageError::InvalidQuality {
                quality: request.quality,
            });
        }
        let quality = request.quality;

        // Hard-reject dimensions over the configured maxima
        validate_dimensions(
            request.width,
            request.height,
            self.options.max_width,
            self.options.max_height,
        )?;

        // Identity after validation; keeps the cache key downstream of the
        // clamp for every caller
        let (width, height) = clamp_dimensions(
            request.width,
            request.height,
            self.options.max_width,
            self.options.max_height,
        );

        let cache_key = derive_cache_key(request.stem(), width, height, quality);

        // Check the cache first
        if let Some(data) = self.cache.read(&cache_key).await? {
            return Ok(ResizeOutcome {
                data,
                cache_hit: true,
                quality,
            });
        }

        // Cache miss - produce the variant, sharing the work with any
        // concurrent request for the same key
        loop {
            let state = {
                let mut in_flight = self.in_flight.lock().await;

                if let Some(state) = in_flight.get(&cache_key) {
                    // Another task is already producing this variant
                    state.clone()
                } else {
                    // We're the leader for this variant
                    let state = Arc::new(InFlightState {
                        notify: Notify::new(),
                        result: Mutex::new(None),
                    });
                    in_flight.insert(cache_key.clone(), state.clone());
                    drop(in_flight);

                    // Perform the production
                    let result = self
                        .produce_variant(&request, width, height, &cache_key)
                        .await;

                    // Store result for waiters
                    {
                        let mut result_guard = state.result.lock().await;
                        *result_guard = Some(result.clone());
                    }

                    // Clean up in_flight and notify waiters
                    {
                        let mut in_flight = self.in_flight.lock().await;
                        in_flight.remove(&cache_key);
                    }
                    state.notify.notify_waiters();

                    return result.map(|data| ResizeOutcome {
                        data,
                        cache_hit: false,
                        quality,
                    });
                }
            };

            // Register for the notification before re-checking the result,
            // so a leader finishing in between still wakes us
            let notified = state.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let result_guard = state.result.lock().await;
                if let Some(ref result) = *result_guard {
                    return result.clone().map(|data| ResizeOutcome {
                        data,
                        cache_hit: false,
                        quality,
                    });
                }
            }

            // Wait for the leader to finish
            notified.await;

            // Check if result is available
            {
                let result_guard = state.result.lock().await;
                if let Some(ref result) = *result_guard {
                    return result.clone().map(|data| ResizeOutcome {
                        data,
                        cache_hit: false,
                        quality,
                    });
                }
            }

            // Result not yet available, loop back (shouldn't normally happen)
        }
    }

    /// Produce a variant without consulting the cache for a hit.
    ///
    /// Reads the original, transforms it, writes the result to the cache,
    /// and runs the eviction sweep.
    async fn produce_variant(
        &self,
        request: &ResizeRequest,
        width: Option<u32>,
        height: Option<u32>,
        cache_key: &str,
    ) -> Result<Bytes, ImageError> {
        let original_path = request.original_path();
        let original = self.assets.read(&original_path).await?;

        // Originals are decoded whole; record the input size first
        debug!(
            path = %original_path,
            bytes = original.len(),
            key = %cache_key,
            "producing resized variant"
        );

        let variant = self
            .transformer
            .transform(&original, width, height, request.quality)?;

        self.cache.write(cache_key, &variant).await?;

        // Best-effort sweep; never fails the request
        let removed = self.evictor.enforce(&self.cache).await;
        if removed > 0 {
            debug!(removed, "cache sweep after write");
        }

        Ok(variant)
    }

    /// Read a plain (non-resize) asset from the assets directory.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the path does not resolve to a regular file
    /// under the assets root.
    pub async fn plain_asset(&self, path: &str) -> Result<Bytes, ImageError> {
        self.assets.read(path).await
    }

    /// Read the dimensions and detected format of an original asset.
    pub async fn image_info(&self, path: &str) -> Result<ImageInfo, ImageError> {
        let original = self.assets.read(path).await?;
        self.transformer.probe(&original)
    }

    /// Get a reference to the underlying asset store.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Get a reference to the underlying cache store.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Get the configured limits.
    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }
}

// =============================================================================
// Tests
// =============================================================================
