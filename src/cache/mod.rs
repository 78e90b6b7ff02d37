//! On-disk variant cache.
//!
//! Resized variants live as flat `<hex-digest>.jpg` files in a single
//! directory. [`CacheStore`] is the storage seam (with [`DiskCache`] as the
//! filesystem implementation) and [`CacheEvictor`] keeps the entry count
//! within the configured bound.

pub mod evict;
pub mod store;

pub use evict::{CacheEvictor, DEFAULT_MAX_CACHE_FILES};
pub use store::{CacheEntry, CacheStore, DiskCache};
