use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{ArtifactStorage, ArtifactStorageError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::azure_artifact_storage::AzureArtifactStorage;
use super::local_artifact_storage::LocalArtifactStorage;

pub struct ArtifactStorageFactory;

impl ArtifactStorageFactory {
    pub fn create(
        settings: &StorageSettings,
    ) -> Result<Arc<dyn ArtifactStorage>, ArtifactStorageError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let storage = LocalArtifactStorage::new(path)?;
                Ok(Arc::new(storage))
            }
            StorageProviderSetting::Azure => {
                let account = required(settings.azure_account.as_deref(), "azure_account")?;
                let key = required(settings.azure_access_key.as_deref(), "azure_access_key")?;
                let container =
                    required(settings.azure_container.as_deref(), "azure_container")?;
                let storage = AzureArtifactStorage::new(account, key, container)?;
                Ok(Arc::new(storage))
            }
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ArtifactStorageError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ArtifactStorageError::Configuration(format!("{} required", name)))
}
