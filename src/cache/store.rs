//! Disk-backed store for resized JPEG variants.
//!
//! The cache is a flat directory of `<hex-digest>.jpg` files. There is no
//! index or manifest; the directory listing is the only source of truth.
//! Writes go through a temp file and a rename so concurrent readers never
//! observe partial content, and the `.jpg` filter on enumeration keeps
//! in-progress temp files invisible to every other operation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::trace;

use crate::error::CacheError;

/// Sequence for unique temp file names within this process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

// =============================================================================
// CacheStore Trait
// =============================================================================

/// A cache entry as seen by enumeration: name, size and recency.
///
/// Entry content is never part of a listing; eviction only needs the
/// modification time, and diagnostics only need the size.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cache key, which is also the entry's filename
    pub key: String,

    /// Entry size in bytes
    pub size: u64,

    /// Filesystem modification time, the recency signal for eviction
    pub modified: SystemTime,
}

/// Storage backend for cached variants.
///
/// This abstraction keeps the orchestration and eviction logic independent
/// of the backing store, so tests can wrap or replace the disk
/// implementation and a future deployment could swap in a remote store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether an entry exists for `key`.
    async fn exists(&self, key: &str) -> bool;

    /// Read the entry for `key`, or `None` if absent.
    ///
    /// Absence is not an error; any other filesystem failure is.
    async fn read(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Write `data` as the entry for `key`, creating the cache directory if
    /// needed. Readers of the same key concurrently with this call see
    /// either the previous content or the new content, never a mix.
    async fn write(&self, key: &str, data: &[u8]) -> Result<(), CacheError>;

    /// Delete the entry for `key`.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Enumerate all entries with their sizes and modification times.
    async fn entries(&self) -> Result<Vec<CacheEntry>, CacheError>;
}

// =============================================================================
// Disk Cache
// =============================================================================

/// Flat-directory disk implementation of [`CacheStore`].
#[derive(Debug, Clone)]
pub struct DiskCache {
    /// Directory holding the cache files
    dir: PathBuf,
}

impl DiskCache {
    /// Create a disk cache rooted at `dir`.
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The configured cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

/// Keys must name flat files directly in the cache directory.
///
/// Derived keys are hex digests and always pass; this guards direct library
/// callers from escaping the directory through a crafted key.
fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[async_trait]
impl CacheStore for DiskCache {
    async fn exists(&self, key: &str) -> bool {
        if validate_key(key).is_err() {
            return false;
        }
        fs::metadata(self.entry_path(key))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn read(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(&path, &e)),
        }
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<(), CacheError> {
        validate_key(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CacheError::io(&self.dir, &e))?;

        // Unique per process and per call; two processes sharing a cache
        // directory are separated by the pid.
        let temp_name = format!(
            "{key}.{}.{}.tmp",
            std::process::id(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
        );
        let temp_path = self.dir.join(temp_name);
        let final_path = self.entry_path(key);

        fs::write(&temp_path, data)
            .await
            .map_err(|e| CacheError::io(&temp_path, &e))?;

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::io(&final_path, &e));
        }

        trace!(key, bytes = data.len(), "wrote cache entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        fs::remove_file(&path)
            .await
            .map_err(|e| CacheError::io(&path, &e))
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let mut reader = match fs::read_dir(&self.dir).await {
            Ok(reader) => reader,
            // A cache directory that does not exist yet is simply empty
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(&self.dir, &e)),
        };

        let mut entries = Vec::new();
        while let Some(dir_entry) = reader
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.dir, &e))?
        {
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jpg") {
                continue;
            }
            let Some(key) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            // Entries can disappear between listing and stat; skip them
            let Ok(metadata) = dir_entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().map_err(|e| CacheError::io(&path, &e))?;
            entries.push(CacheEntry {
                key: key.to_string(),
                size: metadata.len(),
                modified,
            });
        }

        Ok(entries)
    }
}

// =============================================================================
// Tests
// =============================================================================
