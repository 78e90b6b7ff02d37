//! Request path parsing for the resize filename protocol.
//!
//! Incoming asset paths either reference a file directly or encode a resize
//! request in the filename: `<base>-<width>-<height>.<ext>`. The dimensions
//! are part of the filename, so `photos/dog-300-200.jpg` asks for
//! `photos/dog.jpg` resized to 300x200, while `photos/dog.jpg` asks for the
//! file as-is.
//!
//! Parsing is total: every input string maps to exactly one of the two
//! request kinds, and a filename that merely resembles the protocol (zero
//! dimensions, digits too large for `u32`) falls back to a plain asset
//! reference rather than an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::resize::DEFAULT_JPEG_QUALITY;

/// Filename pattern for resize requests: `<base>-<width>-<height>.<ext>`.
///
/// The base is matched greedily, so `my-dog-300-200.jpg` parses as base
/// `my-dog` with dimensions 300x200. Extensions match case-insensitively.
static RESIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+)-(\d+)-(\d+)\.(jpg|jpeg|png)$").unwrap());

// =============================================================================
// Request Types
// =============================================================================

/// A parsed asset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRequest {
    /// The filename matched the resize protocol.
    Resize(ResizeRequest),

    /// Anything else: serve the path as a plain file.
    Plain(String),
}

/// A request for a resized JPEG variant of an original asset.
///
/// Paths encoded on the wire always carry both dimensions; the fields are
/// optional so library callers can request a single-dimension,
/// aspect-preserving resize directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    /// Directory component of the request path, empty at the root
    pub dir: String,

    /// Base filename without dimensions or extension (e.g. "dog")
    pub base: String,

    /// Extension of the original asset as requested (e.g. "jpg", "PNG")
    pub extension: String,

    /// Target width in pixels
    pub width: Option<u32>,

    /// Target height in pixels
    pub height: Option<u32>,

    /// JPEG quality for the output (1-100)
    pub quality: u8,
}

impl ResizeRequest {
    /// Create a resize request with the default JPEG quality.
    pub fn new(
        dir: impl Into<String>,
        base: impl Into<String>,
        extension: impl Into<String>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Self {
        Self {
            dir: dir.into(),
            base: base.into(),
            extension: extension.into(),
            width,
            height,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Create a resize request with an explicit JPEG quality.
    pub fn with_quality(
        dir: impl Into<String>,
        base: impl Into<String>,
        extension: impl Into<String>,
        width: Option<u32>,
        height: Option<u32>,
        quality: u8,
    ) -> Self {
        Self {
            dir: dir.into(),
            base: base.into(),
            extension: extension.into(),
            width,
            height,
            quality,
        }
    }

    /// Relative path of the original asset: `<dir>/<base>.<ext>`.
    pub fn original_path(&self) -> String {
        if self.dir.is_empty() {
            format!("{}.{}", self.base, self.extension)
        } else {
            format!("{}/{}.{}", self.dir, self.base, self.extension)
        }
    }

    /// Source identity used for cache key derivation.
    ///
    /// This is the base filename only. Same-named files in different
    /// directories share cache entries; the key does not disambiguate them.
    pub fn stem(&self) -> &str {
        &self.base
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a URL-decoded relative request path into an [`AssetRequest`].
///
/// Splits the path into directory and filename, then matches the filename
/// against the resize protocol. Never fails: any filename that does not
/// encode a valid resize request (including one with a zero dimension or a
/// dimension that overflows `u32`) yields [`AssetRequest::Plain`].
///
/// # Example
///
/// ```
/// use image_cdn::assets::{parse_request_path, AssetRequest};
///
/// match parse_request_path("photos/dog-300-200.jpg") {
///     AssetRequest::Resize(req) => {
///         assert_eq!(req.original_path(), "photos/dog.jpg");
///         assert_eq!(req.width, Some(300));
///         assert_eq!(req.height, Some(200));
///     }
///     AssetRequest::Plain(_) => unreachable!(),
/// }
/// ```
pub fn parse_request_path(path: &str) -> AssetRequest {
    let (dir, filename) = match path.rsplit_once('/') {
        Some((dir, filename)) => (dir, filename),
        None => ("", path),
    };

    if let Some(captures) = RESIZE_PATTERN.captures(filename) {
        let width = captures[2].parse::<u32>().ok();
        let height = captures[3].parse::<u32>().ok();

        // Zero or unrepresentable dimensions mean the filename does not
        // encode a resize request; fall through to the plain-asset case.
        if let (Some(w @ 1..), Some(h @ 1..)) = (width, height) {
            return AssetRequest::Resize(ResizeRequest::new(
                dir,
                &captures[1],
                &captures[4],
                Some(w),
                Some(h),
            ));
        }
    }

    AssetRequest::Plain(path.to_string())
}

// =============================================================================
// Tests
// =============================================================================
