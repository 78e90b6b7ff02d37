//! Dimension and quality policy for resize requests.
//!
//! Over-maximum dimensions are rejected outright, on the HTTP path and the
//! library path alike; the clamp helper stays in the pipeline between
//! validation and key derivation so cache keys are always fed clamped
//! values, but after validation it is an identity.

use crate::error::ImageError;

/// Default JPEG quality for resized variants (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Default maximum output width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 5000;

/// Default maximum output height in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 5000;

// =============================================================================
// Dimension Policy
// =============================================================================

/// Reject requested dimensions that exceed the configured maxima.
///
/// # Errors
///
/// [`ImageError::WidthTooLarge`] or [`ImageError::HeightTooLarge`] for the
/// first offending axis.
pub fn validate_dimensions(
    width: Option<u32>,
    height: Option<u32>,
    max_width: u32,
    max_height: u32,
) -> Result<(), ImageError> {
    if let Some(w) = width {
        if w > max_width {
            return Err(ImageError::WidthTooLarge {
                requested: w,
                max: max_width,
            });
        }
    }
    if let Some(h) = height {
        if h > max_height {
            return Err(ImageError::HeightTooLarge {
                requested: h,
                max: max_height,
            });
        }
    }
    Ok(())
}

/// Cap each dimension independently at its configured maximum.
pub fn clamp_dimensions(
    width: Option<u32>,
    height: Option<u32>,
    max_width: u32,
    max_height: u32,
) -> (Option<u32>, Option<u32>) {
    (
        width.map(|w| w.min(max_width)),
        height.map(|h| h.min(max_height)),
    )
}

/// Compute the output dimensions for a source image.
///
/// - both targets given: exactly `(width, height)`, aspect ratio ignored;
/// - one target given: the other side scales to preserve aspect ratio,
///   rounded to the nearest pixel with a floor of 1;
/// - neither given: `None`, meaning no resize.
pub fn resolve_target(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> Option<(u32, u32)> {
    let (source_width, source_height) = source;
    match (width, height) {
        (Some(w), Some(h)) => Some((w, h)),
        (Some(w), None) => {
            let h = scale_axis(source_height, w, source_width);
            Some((w, h))
        }
        (None, Some(h)) => {
            let w = scale_axis(source_width, h, source_height);
            Some((w, h))
        }
        (None, None) => None,
    }
}

/// `other * target / reference`, rounded, at least 1 pixel.
fn scale_axis(other: u32, target: u32, reference: u32) -> u32 {
    let scaled = (other as f64 * target as f64 / reference as f64).round() as u32;
    scaled.max(1)
}

// =============================================================================
// Quality Helpers
// =============================================================================

/// Validate JPEG quality parameter.
///
/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to the valid range.
///
/// Values below 1 become 1, values above 100 become 100.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
