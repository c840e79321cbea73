use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use tracing::instrument;

use crate::application::ports::{ArtifactStorage, ArtifactStorageError};

pub struct AzureArtifactStorage {
    inner: Arc<dyn ObjectStore>,
    base_url: String,
}

impl AzureArtifactStorage {
    pub fn new(
        account: &str,
        access_key: &str,
        container: &str,
    ) -> Result<Self, ArtifactStorageError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| ArtifactStorageError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            base_url: format!("https://{}.blob.core.windows.net/{}", account, container),
        })
    }
}

#[async_trait]
impl ArtifactStorage for AzureArtifactStorage {
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn put(&self, key: &str, body: Bytes) -> Result<String, ArtifactStorageError> {
        let store_path = StorePath::from(key);
        self.inner
            .put(&store_path, PutPayload::from(body))
            .await
            .map_err(|e| ArtifactStorageError::UploadFailed(e.to_string()))?;

        Ok(format!("{}/{}", self.base_url, store_path))
    }
}
