use std::io;

use bytes::Bytes;

use crate::domain::StoragePath;

/// Object storage for uploaded scripts and synthesized audio.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, BlobStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, BlobStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), BlobStoreError>;

    /// Client-facing url of a stored object.
    fn url_for(&self, path: &StoragePath) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
