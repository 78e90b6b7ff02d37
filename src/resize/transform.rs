//! Image transformation: decode, normalize, resize, and JPEG encode.
//!
//! This module turns an original asset (JPEG or PNG) into the bytes of a
//! resized JPEG variant. It is pure computation: no disk or network I/O,
//! no caching, no knowledge of request paths.
//!
//! # Design Decisions
//!
//! - **Always re-encode**: every variant goes through a full decode/encode
//!   cycle, even when no resize applies. Output is always baseline JPEG,
//!   regardless of source format.
//!
//! - **White matte**: JPEG cannot carry transparency, so sources with an
//!   alpha channel are composited over an opaque white background before
//!   encoding. Grayscale and palette sources are expanded to RGB.
//!
//! - **Lanczos3 resampling**: the slowest filter `image` offers, and the
//!   one that looks best for photographic downscaling.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::io::Cursor;

use crate::error::ImageError;
use crate::resize::limits::{clamp_quality, resolve_target};

// =============================================================================
// Image Metadata
// =============================================================================

/// Basic metadata read from an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Detected container format, if recognized.
    pub format: Option<ImageFormat>,
}

// =============================================================================
// Image Transformer
// =============================================================================

/// Decoder/encoder for producing resized JPEG variants.
///
/// The transformer takes raw source bytes, normalizes them to RGB (flattening
/// any alpha channel onto white), resizes when target dimensions are given,
/// and re-encodes as JPEG at the requested quality.
///
/// # Example
///
/// ```ignore
/// use image_cdn::resize::ImageTransformer;
///
/// let transformer = ImageTransformer::new();
///
/// // Raw PNG or JPEG bytes from the assets directory
/// let source: Vec<u8> = /* ... */;
///
/// // 300 wide, height follows the aspect ratio, quality 85
/// let jpeg = transformer.transform(&source, Some(300), None, 85)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImageTransformer {
    // Stateless today; the struct leaves room for encoder settings later
}

impl ImageTransformer {
    /// Create a new transformer.
    pub fn new() -> Self {
        Self {}
    }

    /// Decode source bytes, normalize, resize, and encode as JPEG.
    ///
    /// # Arguments
    ///
    /// * `source` - Raw JPEG or PNG bytes
    /// * `width` - Target width in pixels, or `None` to derive from height
    /// * `height` - Target height in pixels, or `None` to derive from width
    /// * `quality` - Output JPEG quality (clamped to 1-100)
    ///
    /// When both dimensions are given the output is exactly `width`x`height`,
    /// ignoring the source aspect ratio. With one dimension the other is
    /// scaled to preserve aspect. With neither, the source size is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source is not a decodable image
    /// - JPEG encoding fails
    pub fn transform(
        &self,
        source: &[u8],
        width: Option<u32>,
        height: Option<u32>,
        quality: u8,
    ) -> Result<Bytes, ImageError> {
        let quality = clamp_quality(quality);

        let reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| ImageError::DecodeError {
                message: e.to_string(),
            })?;

        let decoded = reader.decode().map_err(|e| ImageError::DecodeError {
            message: e.to_string(),
        })?;

        let flat = flatten_to_rgb(decoded);

        let output_image = match resolve_target(flat.dimensions(), width, height) {
            Some((target_width, target_height)) => {
                imageops::resize(&flat, target_width, target_height, FilterType::Lanczos3)
            }
            None => flat,
        };

        // Encode to JPEG at requested quality
        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, quality);

        encoder
            .encode_image(&output_image)
            .map_err(|e| ImageError::EncodeError {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }

    /// Read image dimensions and format without a full decode.
    ///
    /// Useful for metadata queries and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the header is not a recognizable image.
    pub fn probe(&self, source: &[u8]) -> Result<ImageInfo, ImageError> {
        let reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| ImageError::DecodeError {
                message: e.to_string(),
            })?;

        let format = reader.format();

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| ImageError::DecodeError {
                message: e.to_string(),
            })?;

        Ok(ImageInfo {
            width,
            height,
            format,
        })
    }
}

// =============================================================================
// Alpha Flattening
// =============================================================================

/// Normalize any decoded image to RGB, compositing alpha onto white.
fn flatten_to_rgb(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        // Covers RGB, grayscale, and 16-bit variants in one conversion
        return image.into_rgb8();
    }

    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut flat = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        flat.put_pixel(
            x,
            y,
            Rgb([
                blend_over_white(r, a),
                blend_over_white(g, a),
                blend_over_white(b, a),
            ]),
        );
    }

    flat
}

/// Composite one channel over a white background.
///
/// Integer form of `c * a + 255 * (1 - a)` with rounding: alpha 255 returns
/// the channel unchanged, alpha 0 returns white.
#[inline]
fn blend_over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

// =============================================================================
// Tests
// =============================================================================
