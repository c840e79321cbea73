mod artifact_storage_factory;
mod azure_artifact_storage;
mod local_artifact_storage;

pub use artifact_storage_factory::ArtifactStorageFactory;
pub use azure_artifact_storage::AzureArtifactStorage;
pub use local_artifact_storage::LocalArtifactStorage;
