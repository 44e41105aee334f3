//! Object storage for uploaded media.

use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("empty file name")]
    EmptyName,
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredBlob {
    pub url: String,
    pub filename: String,
}

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, filename: &str, bytes: &[u8], content_type: Option<&str>) -> Result<StoredBlob, BlobError>;
}

/// Stored key for an upload: millisecond timestamp, a dash, then the original
/// file name with path separators removed.
pub fn object_key(original: &str, now_millis: i64) -> Result<String, BlobError> {
    let name: String = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(BlobError::EmptyName);
    }
    Ok(format!("{now_millis}-{name}"))
}

/// Writes files under a local directory served at `public_url`.
#[derive(Clone, Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self { root: root.into(), public_url: public_url.into() }
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, filename: &str, bytes: &[u8], content_type: Option<&str>) -> Result<StoredBlob, BlobError> {
        let key = object_key(filename, Utc::now().timestamp_millis())?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&key), bytes).await?;
        info!(key = %key, size = bytes.len(), content_type = content_type.unwrap_or("application/octet-stream"), "blob stored");
        Ok(StoredBlob { url: format!("{}/{}", self.public_url, key), filename: key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("photo.jpg", 1700000000000).unwrap(), "1700000000000-photo.jpg");
        assert_eq!(object_key("../../etc/passwd", 1).unwrap(), "1-passwd");
        assert_eq!(object_key("C:\\tmp\\a b.png", 2).unwrap(), "2-a b.png");
        assert!(matches!(object_key("dir/", 3), Err(BlobError::EmptyName)));
    }

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let root = std::env::temp_dir().join(format!("farm-blob-test-{}", uuid::Uuid::new_v4()));
        let store = LocalBlobStore::new(&root, "/uploads");
        let stored = store.put("miel.png", b"png-bytes", Some("image/png")).await.unwrap();
        assert!(stored.filename.ends_with("-miel.png"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.filename));
        assert_eq!(tokio::fs::read(root.join(&stored.filename)).await.unwrap(), b"png-bytes");
        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
