//! Configuration management for the image service.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use image_cdn::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! // Access configuration
//! println!("Listening on {}:{}", config.host, config.port);
//! println!("Serving assets from {}", config.assets_dir);
//! ```
//!
//! # Environment Variables
//!
//! All configuration options can be set via environment variables:
//!
//! - `ASSETS_DIR` - Directory containing original assets (required)
//! - `CACHE_DIR` - Directory for cached variants (default: /tmp/image_cache)
//! - `BASE_URL` - Public base URL, logged at startup
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 8001)
//! - `MAX_WIDTH` - Maximum resize width (default: 5000)
//! - `MAX_HEIGHT` - Maximum resize height (default: 5000)
//! - `DEFAULT_QUALITY` - JPEG quality for variants (default: 85)
//! - `MAX_CACHE_FILES` - Cached variant count bound (default: 1000)
//! - `CORS_ORIGINS` - Allowed CORS origins, comma-separated

use clap::Parser;

use crate::cache::DEFAULT_MAX_CACHE_FILES;
use crate::resize::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8001;

/// Default directory for cached variants.
pub const DEFAULT_CACHE_DIR: &str = "/tmp/image_cache";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image CDN - An asset server with on-the-fly resizing.
///
/// Serves original image assets from a local directory and produces resized
/// JPEG variants on demand, cached on disk for subsequent requests.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-cdn")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Public base URL where the service is reachable.
    ///
    /// Only used for startup diagnostics; the server behaves the same
    /// whether or not it is set.
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    // =========================================================================
    // Asset Configuration
    // =========================================================================
    /// Directory containing the original image assets.
    #[arg(long, env = "ASSETS_DIR")]
    pub assets_dir: String,

    /// Directory where resized variants are cached.
    #[arg(long, default_value = DEFAULT_CACHE_DIR, env = "CACHE_DIR")]
    pub cache_dir: String,

    // =========================================================================
    // Resize Configuration
    // =========================================================================
    /// Maximum width a variant may request.
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH, env = "MAX_WIDTH")]
    pub max_width: u32,

    /// Maximum height a variant may request.
    #[arg(long, default_value_t = DEFAULT_MAX_HEIGHT, env = "MAX_HEIGHT")]
    pub max_height: u32,

    /// JPEG quality for resized variants (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "DEFAULT_QUALITY")]
    pub default_quality: u8,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Maximum number of cached variant files to keep on disk.
    #[arg(long, default_value_t = DEFAULT_MAX_CACHE_FILES, env = "MAX_CACHE_FILES")]
    pub max_cache_files: usize,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        // Validate assets directory is configured
        if self.assets_dir.is_empty() {
            return Err(
                "Assets directory is required. Set --assets-dir or ASSETS_DIR".to_string(),
            );
        }

        // Validate cache directory is configured
        if self.cache_dir.is_empty() {
            return Err("Cache directory must not be empty. Set --cache-dir or CACHE_DIR".to_string());
        }

        // Validate resize maxima
        if self.max_width == 0 {
            return Err("max_width must be greater than 0".to_string());
        }
        if self.max_height == 0 {
            return Err("max_height must be greater than 0".to_string());
        }

        // Validate JPEG quality
        if self.default_quality == 0 || self.default_quality > 100 {
            return Err("default_quality must be between 1 and 100".to_string());
        }

        // Validate cache bound
        if self.max_cache_files == 0 {
            return Err("max_cache_files must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
