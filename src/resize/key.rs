//! Cache key derivation for resized variants.
//!
//! A key is the SHA-256 of `"{stem}/{width}/{height}/{quality}"` in
//! lowercase hex, with a fixed `.jpg` extension so the key doubles as the
//! cache filename. Absent dimensions render as `none`. `/` cannot occur
//! inside any of the fields (the stem is a single path component), so
//! distinct tuples always hash distinct strings.

use sha2::{Digest, Sha256};

/// Derive the cache filename for a `(stem, width, height, quality)` tuple.
///
/// Deterministic: equal tuples always produce the identical key. The stem
/// is the original's base filename without directory or extension, so the
/// same name in two directories maps to one entry.
///
/// # Example
///
/// ```
/// use image_cdn::resize::derive_cache_key;
///
/// let key = derive_cache_key("dog", Some(300), Some(200), 85);
/// assert!(key.ends_with(".jpg"));
/// assert_eq!(key.len(), 64 + 4);
/// ```
pub fn derive_cache_key(stem: &str, width: Option<u32>, height: Option<u32>, quality: u8) -> String {
    let input = format!(
        "{stem}/{}/{}/{quality}",
        dimension_field(width),
        dimension_field(height)
    );
    let digest = Sha256::digest(input.as_bytes());
    format!("{}.jpg", hex::encode(digest))
}

fn dimension_field(dim: Option<u32>) -> String {
    match dim {
        Some(value) => value.to_string(),
        None => "none".to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
