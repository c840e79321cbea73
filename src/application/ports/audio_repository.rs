use crate::domain::{AudioFile, AudioId};
use async_trait::async_trait;

use super::RepositoryError;

#[async_trait]
pub trait AudioRepository: Send + Sync {
    async fn create(&self, audio: &AudioFile) -> Result<(), RepositoryError>;

    async fn get(&self, id: AudioId) -> Result<Option<AudioFile>, RepositoryError>;
}
