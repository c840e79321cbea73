use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{ArtifactRepository, ArtifactStorage};
use crate::domain::{Artifact, ArtifactKind, ArtifactSummary, JobId};

use super::transcription_pipeline::PipelineError;

/// Writes the rendered subtitle bodies to artifact storage and records one
/// row per `(job, kind)`. Publishing the same job again replaces its rows.
pub struct ArtifactPublisher {
    storage: Arc<dyn ArtifactStorage>,
    artifacts: Arc<dyn ArtifactRepository>,
}

impl ArtifactPublisher {
    pub fn new(storage: Arc<dyn ArtifactStorage>, artifacts: Arc<dyn ArtifactRepository>) -> Self {
        Self { storage, artifacts }
    }

    pub async fn publish(
        &self,
        job_id: JobId,
        summary: &ArtifactSummary,
    ) -> Result<Vec<Artifact>, PipelineError> {
        let mut published = Vec::with_capacity(ArtifactKind::ALL.len());

        for kind in ArtifactKind::ALL {
            let key = artifact_key(job_id, kind);
            let body = Bytes::from(summary.body(kind).to_owned());
            let location = self.storage.put(&key, body).await?;
            let artifact = self.artifacts.upsert(job_id, kind, &location).await?;
            tracing::debug!(kind = %kind, location = %location, "Artifact published");
            published.push(artifact);
        }

        Ok(published)
    }
}

pub fn artifact_key(job_id: JobId, kind: ArtifactKind) -> String {
    format!("{}/transcript.{}", job_id.as_uuid(), kind.as_str())
}
