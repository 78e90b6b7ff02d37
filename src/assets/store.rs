//! Read access to original assets under a configured root directory.
//!
//! All request paths are relative; the store is the single place where they
//! are joined onto the assets root, and it enforces that the result stays
//! inside that root. Traversal attempts surface as [`ImageError::NotFound`]
//! so the response does not reveal anything about the surrounding tree.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use crate::error::ImageError;

/// Filesystem source for original image assets.
#[derive(Debug, Clone)]
pub struct AssetStore {
    /// Root directory all request paths resolve under
    root: PathBuf,
}

impl AssetStore {
    /// Create a store serving files under `root`.
    ///
    /// The directory does not need to exist yet; resolution fails per
    /// request until it does.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured assets root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the assets root currently exists as a directory.
    pub async fn root_exists(&self) -> bool {
        fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Read the asset at `rel` (a relative, URL-decoded request path).
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NotFound`] when the file is missing, is not a
    /// regular file, or the path would resolve outside the assets root.
    /// Other filesystem failures surface as [`ImageError::AssetIo`].
    pub async fn read(&self, rel: &str) -> Result<Bytes, ImageError> {
        let path = self.resolve(rel).await?;

        let metadata = fs::metadata(&path)
            .await
            .map_err(|_| ImageError::not_found(rel))?;
        if !metadata.is_file() {
            return Err(ImageError::not_found(rel));
        }

        let data = fs::read(&path)
            .await
            .map_err(|e| ImageError::AssetIo(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = data.len(), "read asset");
        Ok(Bytes::from(data))
    }

    /// Resolve `rel` to an absolute path contained in the assets root.
    ///
    /// Two checks: a lexical pass rejecting `..`, absolute paths and drive
    /// prefixes before anything touches the filesystem, then a canonical
    /// comparison so symlinks inside the tree cannot point outside it.
    async fn resolve(&self, rel: &str) -> Result<PathBuf, ImageError> {
        let mut full = self.root.clone();
        for component in Path::new(rel).components() {
            match component {
                Component::Normal(part) => full.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ImageError::not_found(rel));
                }
            }
        }

        let canonical_root = fs::canonicalize(&self.root)
            .await
            .map_err(|_| ImageError::not_found(rel))?;
        let canonical = fs::canonicalize(&full)
            .await
            .map_err(|_| ImageError::not_found(rel))?;

        if !canonical.starts_with(&canonical_root) {
            return Err(ImageError::not_found(rel));
        }

        Ok(canonical)
    }
}

// =============================================================================
// Tests
// =============================================================================
