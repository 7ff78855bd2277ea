//! On-disk response cache keyed by URI.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::ScraperError;

/// Stores response bodies as files named by the SHA-256 of their URI.
///
/// Entries never expire; clear the directory to force fresh downloads.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, uri: &str) -> PathBuf {
        self.dir
            .join(format!("{:x}", Sha256::digest(uri.as_bytes())))
    }

    /// Returns the cached body for `uri`, or `None` on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Cache`] if an entry exists but cannot be read.
    pub async fn get(&self, uri: &str) -> Result<Option<String>, ScraperError> {
        let path = self.path_for(uri);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ScraperError::Cache {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    /// Stores `body` as the entry for `uri`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Cache`] if the directory or file cannot be
    /// written.
    pub async fn put(&self, uri: &str, body: &str) -> Result<(), ScraperError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ScraperError::Cache {
                path: self.dir.display().to_string(),
                source: e,
            })?;

        let path = self.path_for(uri);
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| ScraperError::Cache {
                path: path.display().to_string(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn miss_then_hit() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cache = ResponseCache::new(dir.path().join("responses"));

        assert_eq!(cache.get("http://shop.test/").await.unwrap(), None);
        cache.put("http://shop.test/", "<html/>").await.unwrap();
        assert_eq!(
            cache.get("http://shop.test/").await.unwrap().as_deref(),
            Some("<html/>")
        );
    }

    #[tokio::test]
    async fn entries_are_keyed_by_full_uri() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cache = ResponseCache::new(dir.path());

        cache.put("http://shop.test/?offset=0", "first").await.unwrap();
        assert_eq!(cache.get("http://shop.test/?offset=40").await.unwrap(), None);
    }

    #[test]
    fn file_name_is_sha256_hex_of_uri() {
        let cache = ResponseCache::new("/tmp/skog");
        let path = cache.path_for("abc");
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[tokio::test]
    async fn unreadable_entry_is_cache_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cache = ResponseCache::new(dir.path());
        // A directory where the entry file should be cannot be read as text.
        std::fs::create_dir(cache.path_for("http://shop.test/")).expect("create dir");

        let err = cache.get("http://shop.test/").await.unwrap_err();
        assert!(matches!(err, ScraperError::Cache { .. }), "got: {err:?}");
    }
}
