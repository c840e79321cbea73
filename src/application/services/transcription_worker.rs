use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::domain::JobId;

use super::transcription_pipeline::TranscriptionPipeline;

/// Receives job ids and runs each on its own task, at most
/// `max_concurrent_jobs` at a time. Errors are logged, never retried.
pub struct TranscriptionWorker {
    receiver: mpsc::Receiver<JobId>,
    pipeline: Arc<TranscriptionPipeline>,
    permits: Arc<Semaphore>,
}

impl TranscriptionWorker {
    pub fn new(
        receiver: mpsc::Receiver<JobId>,
        pipeline: Arc<TranscriptionPipeline>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            receiver,
            pipeline,
            permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            permits = self.permits.available_permits(),
            "Transcription worker started"
        );
        let mut tasks = JoinSet::new();

        while let Some(job_id) = self.receiver.recv().await {
            let permit = match Arc::clone(&self.permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let pipeline = Arc::clone(&self.pipeline);

            tasks.spawn(async move {
                let _permit = permit;
                if let Err(e) = pipeline.process(job_id).await {
                    tracing::error!(
                        job_id = %job_id.as_uuid(),
                        error = %e,
                        "Transcription job failed"
                    );
                }
            });

            while let Some(joined) = tasks.try_join_next() {
                log_join(joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }
        tracing::info!("Transcription worker stopped: channel closed");
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "Transcription task aborted");
    }
}
