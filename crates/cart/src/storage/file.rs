//! Filesystem storage backend.
//!
//! Each key maps to `<dir>/<url-encoded key>.json`. Writes land in a
//! temporary sibling file first and are renamed into place, so a reader
//! never observes a half-written blob.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{PersistentStore, StorageError};

/// A directory-backed key-value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl PersistentStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), bytes = value.len(), "Persisted value");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_encodes_key() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("@RocketShoes:cart"),
            PathBuf::from("/data/%40RocketShoes%3Acart.json")
        );
        assert_eq!(
            store.path_for("../escape"),
            PathBuf::from("/data/..%2Fescape.json")
        );
    }

    #[tokio::test]
    async fn test_read_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert!(store.read("cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_dir_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.write("cart", "[]").await.unwrap();
        store.write("cart", r#"[{"id":1}]"#).await.unwrap();

        assert_eq!(
            store.read("cart").await.unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert!(!store.path_for("cart").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.write("a", "1").await.unwrap();
        store.write("b", "2").await.unwrap();

        assert_eq!(store.read("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.read("b").await.unwrap().as_deref(), Some("2"));
    }
}
