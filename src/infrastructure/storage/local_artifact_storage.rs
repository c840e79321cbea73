use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use tracing::instrument;

use crate::application::ports::{ArtifactStorage, ArtifactStorageError};

/// Artifact storage rooted at a directory on the local filesystem.
pub struct LocalArtifactStorage {
    base_path: PathBuf,
    inner: Arc<LocalFileSystem>,
}

impl LocalArtifactStorage {
    pub fn new(base_path: PathBuf) -> Result<Self, ArtifactStorageError> {
        std::fs::create_dir_all(&base_path)?;
        let base_path = base_path.canonicalize()?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| ArtifactStorageError::Configuration(e.to_string()))?;
        Ok(Self {
            base_path,
            inner: Arc::new(fs),
        })
    }
}

#[async_trait]
impl ArtifactStorage for LocalArtifactStorage {
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn put(&self, key: &str, body: Bytes) -> Result<String, ArtifactStorageError> {
        let store_path = StorePath::from(key);
        self.inner
            .put(&store_path, PutPayload::from(body))
            .await
            .map_err(|e| ArtifactStorageError::UploadFailed(e.to_string()))?;

        Ok(self.base_path.join(key).display().to_string())
    }
}
