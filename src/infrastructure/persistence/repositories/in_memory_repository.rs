use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::ports::{
    ArtifactRepository, AudioRepository, JobRepository, RepositoryError, SegmentRepository,
};
use crate::domain::{
    Artifact, ArtifactKind, AudioFile, AudioId, Job, JobId, JobStatus, Segment,
    TranscriptionOutcome,
};

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::ConnectionFailed("in-memory store lock poisoned".to_string())
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: JobId, apply: F) -> Result<Option<Job>, RepositoryError>
    where
        F: FnOnce(&mut Job) -> bool,
    {
        let mut jobs = self.jobs.lock().map_err(poisoned)?;
        Ok(jobs
            .get_mut(&id)
            .and_then(|job| apply(job).then(|| job.clone())))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().map_err(poisoned)?;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} already exists",
                job.id.as_uuid()
            )));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let jobs = self.jobs.lock().map_err(poisoned)?;
        Ok(jobs.get(&id).cloned())
    }

    async fn mark_running(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        self.update(id, |job| {
            if job.status != JobStatus::Queued {
                return false;
            }
            job.status = JobStatus::Running;
            true
        })
    }

    async fn mark_succeeded(
        &self,
        id: JobId,
        outcome: &TranscriptionOutcome,
    ) -> Result<Option<Job>, RepositoryError> {
        self.update(id, |job| {
            job.status = JobStatus::Succeeded;
            job.language_detected = Some(outcome.language_detected.clone());
            job.confidence = outcome.confidence;
            job.text_full = Some(outcome.text_full.clone());
            job.artifacts = Some(outcome.artifacts.clone());
            job.finished_at = Some(Utc::now());
            true
        })
    }

    async fn mark_failed(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        self.update(id, |job| {
            job.status = JobStatus::Failed;
            job.finished_at = Some(Utc::now());
            true
        })
    }

    async fn list_by_audio(
        &self,
        audio_id: AudioId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Job>, RepositoryError> {
        let jobs = self.jobs.lock().map_err(poisoned)?;
        let mut matching: Vec<Job> = jobs
            .values()
            .filter(|job| job.audio_id == audio_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }
}

#[derive(Default)]
pub struct InMemoryAudioRepository {
    files: Mutex<HashMap<AudioId, AudioFile>>,
}

impl InMemoryAudioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AudioRepository for InMemoryAudioRepository {
    async fn create(&self, audio: &AudioFile) -> Result<(), RepositoryError> {
        let mut files = self.files.lock().map_err(poisoned)?;
        files.insert(audio.id, audio.clone());
        Ok(())
    }

    async fn get(&self, id: AudioId) -> Result<Option<AudioFile>, RepositoryError> {
        let files = self.files.lock().map_err(poisoned)?;
        Ok(files.get(&id).cloned())
    }
}

/// Segments are kept per job in insertion order.
#[derive(Default)]
pub struct InMemorySegmentRepository {
    segments: Mutex<HashMap<JobId, Vec<Segment>>>,
}

impl InMemorySegmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SegmentRepository for InMemorySegmentRepository {
    async fn bulk_insert(
        &self,
        job_id: JobId,
        segments: &[Segment],
    ) -> Result<u64, RepositoryError> {
        let mut store = self.segments.lock().map_err(poisoned)?;
        store
            .entry(job_id)
            .or_default()
            .extend(segments.iter().cloned().map(|mut s| {
                s.job_id = job_id;
                s
            }));
        Ok(segments.len() as u64)
    }

    async fn list(
        &self,
        job_id: JobId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Segment>, RepositoryError> {
        let store = self.segments.lock().map_err(poisoned)?;
        let mut rows = store.get(&job_id).cloned().unwrap_or_default();
        // stable: equal offsets keep insertion order
        rows.sort_by_key(|s| s.start_ms);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn delete_by_job(&self, job_id: JobId) -> Result<u64, RepositoryError> {
        let mut store = self.segments.lock().map_err(poisoned)?;
        Ok(store.remove(&job_id).map_or(0, |rows| rows.len() as u64))
    }
}

#[derive(Default)]
pub struct InMemoryArtifactRepository {
    artifacts: Mutex<Vec<Artifact>>,
}

impl InMemoryArtifactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactRepository for InMemoryArtifactRepository {
    async fn upsert(
        &self,
        job_id: JobId,
        kind: ArtifactKind,
        location: &str,
    ) -> Result<Artifact, RepositoryError> {
        let mut artifacts = self.artifacts.lock().map_err(poisoned)?;
        artifacts.retain(|a| !(a.job_id == job_id && a.kind == kind));
        let artifact = Artifact {
            job_id,
            kind,
            location: location.to_string(),
            created_at: Utc::now(),
        };
        artifacts.push(artifact.clone());
        Ok(artifact)
    }

    async fn list(&self, job_id: JobId) -> Result<Vec<Artifact>, RepositoryError> {
        let artifacts = self.artifacts.lock().map_err(poisoned)?;
        // newest write is last in the vec
        Ok(artifacts
            .iter()
            .rev()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, job_id: JobId, kind: ArtifactKind) -> Result<bool, RepositoryError> {
        let mut artifacts = self.artifacts.lock().map_err(poisoned)?;
        let before = artifacts.len();
        artifacts.retain(|a| !(a.job_id == job_id && a.kind == kind));
        Ok(artifacts.len() != before)
    }
}
