use crate::domain::{JobId, Segment};
use async_trait::async_trait;

use super::RepositoryError;

#[async_trait]
pub trait SegmentRepository: Send + Sync {
    /// Inserts the batch in order; either every row lands or none does.
    async fn bulk_insert(&self, job_id: JobId, segments: &[Segment])
    -> Result<u64, RepositoryError>;

    /// Ascending `start_ms`, ties in insertion order.
    async fn list(
        &self,
        job_id: JobId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Segment>, RepositoryError>;

    async fn delete_by_job(&self, job_id: JobId) -> Result<u64, RepositoryError>;
}
