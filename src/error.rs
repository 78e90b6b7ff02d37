use thiserror::Error;

/// Errors from the on-disk variant cache
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Filesystem error while reading, writing or scanning the cache directory
    #[error("cache I/O error: {0}")]
    Io(String),

    /// Cache key does not name a flat file in the cache directory
    #[error("invalid cache key: {0}")]
    InvalidKey(String),
}

impl CacheError {
    /// Wrap a filesystem error with the path it occurred on.
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        CacheError::Io(format!("{}: {}", path.display(), err))
    }
}

/// Errors from the image serving and resizing pipeline
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    /// Requested width exceeds the configured maximum (maps to HTTP 400)
    #[error("requested width {requested} exceeds maximum {max}")]
    WidthTooLarge { requested: u32, max: u32 },

    /// Requested height exceeds the configured maximum (maps to HTTP 400)
    #[error("requested height {requested} exceeds maximum {max}")]
    HeightTooLarge { requested: u32, max: u32 },

    /// JPEG quality outside the valid 1-100 range
    #[error("invalid JPEG quality: {quality} (must be 1-100)")]
    InvalidQuality { quality: u8 },

    /// Original asset missing, outside the assets root, or not a regular file
    #[error("asset not found: {path}")]
    NotFound { path: String },

    /// Source image bytes could not be decoded
    #[error("failed to decode image: {message}")]
    DecodeError { message: String },

    /// Output image could not be encoded as JPEG
    #[error("failed to encode JPEG: {message}")]
    EncodeError { message: String },

    /// Error from the variant cache
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Filesystem error while reading an original asset
    #[error("asset I/O error: {0}")]
    AssetIo(String),
}

impl ImageError {
    /// Shorthand for a not-found error on the given request path.
    pub fn not_found(path: impl Into<String>) -> Self {
        ImageError::NotFound { path: path.into() }
    }
}
