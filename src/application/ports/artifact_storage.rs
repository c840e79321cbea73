use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Writes `body` under `key` and returns the location to record.
    async fn put(&self, key: &str, body: Bytes) -> Result<String, ArtifactStorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStorageError {
    #[error("configuration invalid: {0}")]
    Configuration(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
