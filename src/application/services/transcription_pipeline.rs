use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::application::ports::{
    ArtifactStorageError, AudioRepository, JobRepository, RecognitionError, RepositoryError,
    ResourceAcquirer, ResourceError, SegmentRepository, WorkingCopy,
};
use crate::domain::{Job, JobId, RecognitionHints, Segment, TranscriptionOutcome};

use super::artifact_publisher::ArtifactPublisher;
use super::recognition_adapter::{Recognition, RecognitionAdapter};
use super::subtitle_builder::build_summary;

/// Process-wide settings the pipeline is built with. Read once at startup and
/// never looked up from the environment by the pipeline itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub recognition_disabled: bool,
    pub engine_name: String,
    pub precision: String,
    pub job_deadline: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recognition_disabled: false,
            engine_name: "small".to_string(),
            precision: "f32".to_string(),
            job_deadline: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The job was not `queued`; nothing was touched.
    Skipped,
    Succeeded,
}

/// Drives one transcription job from `queued` to a terminal state.
///
/// Steps run strictly in order: acquire the audio, recognize it, persist the
/// segments, build (and optionally publish) the subtitle artifacts, then mark
/// the job `succeeded`. Any error after the job entered `running` marks it
/// `failed` and is returned to the caller. The local working copy is released
/// on every path.
pub struct TranscriptionPipeline {
    jobs: Arc<dyn JobRepository>,
    audio: Arc<dyn AudioRepository>,
    segments: Arc<dyn SegmentRepository>,
    acquirer: Arc<dyn ResourceAcquirer>,
    recognizer: RecognitionAdapter,
    publisher: Option<ArtifactPublisher>,
    config: PipelineConfig,
}

impl TranscriptionPipeline {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        audio: Arc<dyn AudioRepository>,
        segments: Arc<dyn SegmentRepository>,
        acquirer: Arc<dyn ResourceAcquirer>,
        recognizer: RecognitionAdapter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            jobs,
            audio,
            segments,
            acquirer,
            recognizer,
            publisher: None,
            config,
        }
    }

    pub fn with_publisher(mut self, publisher: ArtifactPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn process(&self, job_id: JobId) -> Result<ProcessOutcome, PipelineError> {
        let span = tracing::info_span!(
            "transcription_job",
            job_id = %job_id.as_uuid(),
            engine = %self.config.engine_name,
        );
        self.process_job(job_id).instrument(span).await
    }

    async fn process_job(&self, job_id: JobId) -> Result<ProcessOutcome, PipelineError> {
        let job = match self.jobs.mark_running(job_id).await? {
            Some(job) => job,
            None => return self.explain_skip(job_id).await,
        };
        tracing::debug!(status = %job.status, "Job status transition");

        if self.config.recognition_disabled {
            return self.complete_without_recognition(job_id).await;
        }

        let mut working_copy: Option<WorkingCopy> = None;
        let result = self.run(&job, &mut working_copy).await;

        if let Err(e) = &result {
            tracing::error!(error = %e, "Transcription failed");
            self.mark_failed(job_id).await;
        }

        if let Some(copy) = working_copy.take() {
            release(copy);
        }

        result.map(|_| ProcessOutcome::Succeeded)
    }

    async fn run(
        &self,
        job: &Job,
        working_copy: &mut Option<WorkingCopy>,
    ) -> Result<(), PipelineError> {
        let audio = self
            .audio
            .get(job.audio_id)
            .await?
            .ok_or_else(|| {
                PipelineError::NotFound(format!("audio file {}", job.audio_id.as_uuid()))
            })?;

        let copy = working_copy.insert(self.acquirer.acquire(&audio.resource_locator).await?);
        tracing::debug!(
            locator = %audio.resource_locator,
            path = %copy.path().display(),
            "Audio acquired"
        );

        let recognition = self.recognize(copy.path(), &job.hints).await?;

        let segments: Vec<Segment> = recognition
            .segments
            .iter()
            .map(|s| Segment::new(job.id, s.start_ms, s.end_ms, s.text.clone()))
            .collect();

        if !segments.is_empty() {
            let inserted = self.segments.bulk_insert(job.id, &segments).await?;
            tracing::debug!(inserted, "Segments persisted");
        }

        let artifacts = build_summary(&segments);

        if let Some(publisher) = &self.publisher {
            publisher.publish(job.id, &artifacts).await?;
        }

        let outcome = TranscriptionOutcome {
            language_detected: recognition.language,
            confidence: recognition.confidence,
            text_full: recognition.text_full,
            artifacts,
        };

        self.jobs
            .mark_succeeded(job.id, &outcome)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("transcription {}", job.id.as_uuid())))?;

        tracing::info!(
            segments = outcome.artifacts.num_segments,
            language = %outcome.language_detected,
            "Transcription succeeded"
        );

        Ok(())
    }

    async fn recognize(
        &self,
        audio_path: &Path,
        hints: &RecognitionHints,
    ) -> Result<Recognition, PipelineError> {
        let recognition = self.recognizer.recognize(audio_path, hints);

        let result = match self.config.job_deadline {
            Some(deadline) => tokio::time::timeout(deadline, recognition)
                .await
                .map_err(|_| RecognitionError::DeadlineExceeded(deadline.as_secs()))?,
            None => recognition.await,
        };

        Ok(result?)
    }

    async fn complete_without_recognition(
        &self,
        job_id: JobId,
    ) -> Result<ProcessOutcome, PipelineError> {
        tracing::info!("Recognition disabled, completing job with empty transcript");

        let marked = self
            .jobs
            .mark_succeeded(job_id, &TranscriptionOutcome::empty())
            .await
            .map_err(PipelineError::from)
            .and_then(|job| {
                job.ok_or_else(|| {
                    PipelineError::NotFound(format!("transcription {}", job_id.as_uuid()))
                })
            });

        match marked {
            Ok(_) => Ok(ProcessOutcome::Succeeded),
            Err(e) => {
                tracing::error!(error = %e, "Failed to complete job without recognition");
                self.mark_failed(job_id).await;
                Err(e)
            }
        }
    }

    async fn explain_skip(&self, job_id: JobId) -> Result<ProcessOutcome, PipelineError> {
        match self.jobs.get_by_id(job_id).await? {
            Some(job) => {
                tracing::debug!(status = %job.status, "Job is not queued, nothing to do");
                Ok(ProcessOutcome::Skipped)
            }
            None => Err(PipelineError::NotFound(format!(
                "transcription {}",
                job_id.as_uuid()
            ))),
        }
    }

    async fn mark_failed(&self, job_id: JobId) {
        match self.jobs.mark_failed(job_id).await {
            Ok(Some(_)) => tracing::debug!("Job marked failed"),
            Ok(None) => tracing::warn!("Job vanished before it could be marked failed"),
            Err(e) => tracing::error!(error = %e, "Failed to mark job as failed"),
        }
    }
}

fn release(copy: WorkingCopy) {
    let path = copy.path().to_path_buf();
    if let Err(e) = copy.release() {
        tracing::warn!(
            error = %e,
            path = %path.display(),
            "Failed to remove local working copy"
        );
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("retrieval: {0}")]
    Retrieval(#[from] ResourceError),
    #[error("recognition: {0}")]
    Recognition(#[from] RecognitionError),
    #[error("persistence: {0}")]
    Persistence(#[from] RepositoryError),
    #[error("artifact storage: {0}")]
    Storage(#[from] ArtifactStorageError),
}
