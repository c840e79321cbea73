use crate::domain::{AudioId, Job, JobId, TranscriptionOutcome};
use async_trait::async_trait;

use super::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Conditional `queued -> running` transition, applied as one atomic
    /// update. Returns `None` when the job is missing or not `queued`.
    async fn mark_running(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Records the outcome and stamps `finished_at`. Not guarded on the
    /// current status.
    async fn mark_succeeded(
        &self,
        id: JobId,
        outcome: &TranscriptionOutcome,
    ) -> Result<Option<Job>, RepositoryError>;

    async fn mark_failed(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Newest first.
    async fn list_by_audio(
        &self,
        audio_id: AudioId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Job>, RepositoryError>;
}
