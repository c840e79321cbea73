use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{AudioRepository, JobRepository, RepositoryError};
use crate::domain::{AudioId, Job, JobId, JobMode, RecognitionHints};

/// Creates `queued` jobs and hands their ids to the worker queue.
pub struct TranscriptionService {
    jobs: Arc<dyn JobRepository>,
    audio: Arc<dyn AudioRepository>,
    sender: mpsc::Sender<JobId>,
}

impl TranscriptionService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        audio: Arc<dyn AudioRepository>,
        sender: mpsc::Sender<JobId>,
    ) -> Self {
        Self {
            jobs,
            audio,
            sender,
        }
    }

    pub async fn submit(
        &self,
        audio_id: AudioId,
        mode: JobMode,
        hints: RecognitionHints,
    ) -> Result<Job, SubmitError> {
        if self.audio.get(audio_id).await?.is_none() {
            return Err(SubmitError::AudioNotFound(audio_id));
        }

        let job = Job::new(audio_id, mode, hints);
        self.jobs.create(&job).await?;

        if self.sender.send(job.id).await.is_err() {
            tracing::error!(job_id = %job.id.as_uuid(), "Worker queue closed, failing job");
            if let Err(e) = self.jobs.mark_failed(job.id).await {
                tracing::error!(error = %e, "Failed to mark unscheduled job as failed");
            }
            return Err(SubmitError::QueueClosed(job.id));
        }

        tracing::info!(
            job_id = %job.id.as_uuid(),
            audio_id = %audio_id.as_uuid(),
            "Transcription job enqueued"
        );

        Ok(job)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("audio file not found: {}", .0.as_uuid())]
    AudioNotFound(AudioId),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("transcription queue closed, job {} not scheduled", .0.as_uuid())]
    QueueClosed(JobId),
}
