use crate::domain::{Artifact, ArtifactKind, JobId};
use async_trait::async_trait;

use super::RepositoryError;

#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Insert or replace the row for `(job_id, kind)`, refreshing `created_at`.
    async fn upsert(
        &self,
        job_id: JobId,
        kind: ArtifactKind,
        location: &str,
    ) -> Result<Artifact, RepositoryError>;

    /// Most recently written first.
    async fn list(&self, job_id: JobId) -> Result<Vec<Artifact>, RepositoryError>;

    async fn delete(&self, job_id: JobId, kind: ArtifactKind) -> Result<bool, RepositoryError>;
}
