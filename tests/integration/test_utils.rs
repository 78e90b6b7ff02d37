//! Test utilities for integration tests.
//!
//! This module provides helpers for creating on-disk asset and cache
//! directories, generating small test images, and building routers wired to
//! them.

use axum::Router;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

use image_cdn::assets::AssetStore;
use image_cdn::cache::DiskCache;
use image_cdn::resize::{ImageService, ServiceOptions};
use image_cdn::server::{create_router, RouterConfig};

// =============================================================================
// Test Stack
// =============================================================================

/// Temporary asset and cache directories plus service/router builders over
/// them.
///
/// The directories live as long as the stack, so routers built from it can be
/// dropped and rebuilt to simulate restarts against the same disk state.
pub struct TestStack {
    pub assets_dir: TempDir,
    pub cache_dir: TempDir,
}

impl TestStack {
    pub fn new() -> Self {
        Self {
            assets_dir: tempfile::tempdir().expect("create assets dir"),
            cache_dir: tempfile::tempdir().expect("create cache dir"),
        }
    }

    /// Write an asset file under the assets directory, creating parent
    /// directories as needed.
    pub fn write_asset(&self, rel: &str, data: &[u8]) {
        let path = self.assets_dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create asset parent dirs");
        }
        std::fs::write(path, data).expect("write asset");
    }

    /// Build an image service over the stack's directories.
    pub fn service(&self) -> ImageService<DiskCache> {
        self.service_with_options(ServiceOptions::default())
    }

    pub fn service_with_options(&self, options: ServiceOptions) -> ImageService<DiskCache> {
        ImageService::with_options(
            AssetStore::new(self.assets_dir.path()),
            DiskCache::new(self.cache_dir.path()),
            options,
        )
    }

    /// Build a router with default service options and tracing disabled.
    pub fn router(&self) -> Router {
        self.router_with_options(ServiceOptions::default())
    }

    pub fn router_with_options(&self, options: ServiceOptions) -> Router {
        let config = RouterConfig::new()
            .with_cache_dir(self.cache_dir.path().display().to_string())
            .with_tracing(false);
        create_router(self.service_with_options(options), config)
    }

    /// Number of files currently in the cache directory.
    pub fn cached_file_count(&self) -> usize {
        std::fs::read_dir(self.cache_dir.path())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_file())
                    .count()
            })
            .unwrap_or(0)
    }
}

impl Default for TestStack {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Test Image Creation
// =============================================================================

/// Create a test RGB JPEG image with a gradient pattern.
pub fn create_test_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x % 256) as u8;
        let g = (y % 256) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Create a solid-color RGBA PNG.
pub fn create_test_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Check if data is a valid JPEG.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    // Check SOI marker
    if data[0] != 0xFF || data[1] != 0xD8 {
        return false;
    }

    // Check EOI marker at end
    if data[data.len() - 2] != 0xFF || data[data.len() - 1] != 0xD9 {
        return false;
    }

    // Try to decode it
    image::load_from_memory_with_format(data, ImageFormat::Jpeg).is_ok()
}

/// Decode image data and return its dimensions.
pub fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(data).expect("decode image");
    (img.width(), img.height())
}
