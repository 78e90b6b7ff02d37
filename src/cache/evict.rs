//! Count-bounded cache eviction.
//!
//! The cache holds at most a configured number of entries. After every
//! successful write the evictor lists the directory, sorts by modification
//! time and deletes the oldest entries until the bound holds again.
//!
//! Eviction is best-effort by contract: a failed listing or deletion is
//! logged and skipped, and never fails the request that triggered the
//! sweep. This is the only place in the crate where errors are swallowed.

use tracing::{debug, warn};

use super::store::CacheStore;

/// Default maximum number of cached variants.
pub const DEFAULT_MAX_CACHE_FILES: usize = 1000;

/// Enforces the maximum entry count on a [`CacheStore`].
#[derive(Debug, Clone)]
pub struct CacheEvictor {
    /// Entry count the cache is reduced to when exceeded
    max_files: usize,
}

impl CacheEvictor {
    /// Create an evictor keeping at most `max_files` entries.
    pub fn new(max_files: usize) -> Self {
        Self { max_files }
    }

    /// The configured entry bound.
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Delete oldest-modified entries until at most `max_files` remain.
    ///
    /// Ties on modification time are broken by key so the survivor set is
    /// deterministic even on filesystems with coarse timestamps. Returns
    /// the number of entries actually removed.
    pub async fn enforce<C: CacheStore + ?Sized>(&self, store: &C) -> usize {
        let mut entries = match store.entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cache eviction skipped, listing failed: {}", e);
                return 0;
            }
        };

        if entries.len() <= self.max_files {
            return 0;
        }

        entries.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.key.cmp(&b.key)));

        let excess = entries.len() - self.max_files;
        let mut removed = 0;
        for entry in entries.iter().take(excess) {
            match store.remove(&entry.key).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!("cache eviction could not remove {}: {}", entry.key, e);
                }
            }
        }

        debug!(
            removed,
            remaining = entries.len() - removed,
            limit = self.max_files,
            "cache eviction pass complete"
        );
        removed
    }
}

// =============================================================================
// Tests
// =============================================================================
