use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{BlobStore, BlobStoreError};
use crate::domain::StoragePath;

/// Blob store on the local filesystem. Objects are served back to clients
/// under `public_url`.
pub struct LocalBlobStore {
    inner: Arc<LocalFileSystem>,
    public_url: String,
}

impl LocalBlobStore {
    pub fn new(base_path: PathBuf, public_url: impl Into<String>) -> Result<Self, BlobStoreError> {
        std::fs::create_dir_all(&base_path)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, path: &StoragePath, data: Bytes) -> Result<u64, BlobStoreError> {
        let size = data.len() as u64;
        self.inner
            .put(&ObjectPath::from(path.as_str()), PutPayload::from(data))
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;
        tracing::debug!(path = %path, size, "Object stored");
        Ok(size)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, BlobStoreError> {
        let result = self
            .inner
            .get(&ObjectPath::from(path.as_str()))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => BlobStoreError::NotFound(path.to_string()),
                other => BlobStoreError::DownloadFailed(other.to_string()),
            })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| BlobStoreError::DownloadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), BlobStoreError> {
        self.inner
            .delete(&ObjectPath::from(path.as_str()))
            .await
            .map_err(|e| BlobStoreError::DeleteFailed(e.to_string()))
    }

    fn url_for(&self, path: &StoragePath) -> String {
        format!("{}/{}", self.public_url, path.as_str())
    }
}
