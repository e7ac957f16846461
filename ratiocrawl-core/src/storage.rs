// Object storage for finished crawl output

use crate::error::{CoreError, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;
use url::Url;

/// Lifetime of links handed back to job callers
pub const DEFAULT_LINK_EXPIRATION: Duration = Duration::from_secs(30_000);

/// Where finished crawl output is persisted.
///
/// `presign` returns a time-limited link for retrieving an object that was
/// previously `put`.
pub trait ObjectStore: Send + Sync {
    fn put(&self, key: &str, bytes: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    fn presign(&self, key: &str, expires_in: Duration)
    -> impl Future<Output = Result<String>> + Send;
}

/// Stores objects as files under a root directory and links to them with
/// `file://` URLs carrying an `expires` unix timestamp
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open (creating if needed) a store rooted at `root`
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        tokio::fs::create_dir_all(root.as_ref()).await?;
        let root = tokio::fs::canonicalize(root.as_ref()).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.starts_with('.');
        if !valid {
            return Err(CoreError::Storage(format!("invalid object key: {:?}", key)));
        }
        Ok(self.root.join(key))
    }
}

impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let path = self.object_path(key)?;
        debug!("Writing {} bytes to {}", bytes.len(), path.display());
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn presign(&self, key: &str, expires_in: Duration) -> Result<String> {
        let path = self.object_path(key)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(CoreError::Storage(format!("no such object: {}", key)));
        }

        let mut link = Url::from_file_path(&path)
            .map_err(|_| CoreError::Storage(format!("cannot link to {}", path.display())))?;
        let expires_at = SystemTime::now()
            .checked_add(expires_in)
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(u64::MAX);
        link.query_pairs_mut()
            .append_pair("expires", &expires_at.to_string());

        Ok(link.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_presign() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).await.unwrap();

        store.put("crawl.tsv", b"url\tdepth\tratio\n".to_vec()).await.unwrap();
        let link = store.presign("crawl.tsv", Duration::from_secs(60)).await.unwrap();

        assert!(link.starts_with("file://"));
        assert!(link.contains("crawl.tsv?expires="));
        let stored = std::fs::read(store.root().join("crawl.tsv")).unwrap();
        assert_eq!(stored, b"url\tdepth\tratio\n");
    }

    #[tokio::test]
    async fn test_presign_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.presign("nope.tsv", DEFAULT_LINK_EXPIRATION).await,
            Err(CoreError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("objects")).await.unwrap();
        for key in ["../escape.tsv", "a/b.tsv", "", "..", ".hidden"] {
            assert!(store.put(key, Vec::new()).await.is_err(), "accepted {:?}", key);
        }
    }

    #[tokio::test]
    async fn test_open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("store");
        LocalStore::open(&root).await.unwrap();
        assert!(root.is_dir());
    }
}
