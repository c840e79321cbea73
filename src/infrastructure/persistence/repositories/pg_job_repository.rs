use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{
    ArtifactSummary, AudioId, Job, JobId, JobMode, JobStatus, RecognitionHints,
    TranscriptionOutcome,
};

const JOB_COLUMNS: &str = "id, audio_id, mode, status, language_hint, model_name, temperature, \
     beam_size, language_detected, confidence, text_full, artifacts, started_at, finished_at";

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    audio_id: Uuid,
    mode: String,
    status: String,
    language_hint: Option<String>,
    model_name: Option<String>,
    temperature: Option<f32>,
    beam_size: Option<i32>,
    language_detected: Option<String>,
    confidence: Option<f64>,
    text_full: Option<String>,
    artifacts: Option<Json<ArtifactSummary>>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for Job {
    type Error = RepositoryError;

    fn try_from(r: JobRow) -> Result<Self, Self::Error> {
        let status = r
            .status
            .parse::<JobStatus>()
            .map_err(RepositoryError::QueryFailed)?;
        let mode = JobMode::parse(&r.mode)
            .ok_or_else(|| RepositoryError::QueryFailed(format!("Invalid job mode: {}", r.mode)))?;

        Ok(Job {
            id: JobId::from_uuid(r.id),
            audio_id: AudioId::from_uuid(r.audio_id),
            mode,
            hints: RecognitionHints {
                language: r.language_hint,
                model_name: r.model_name,
                temperature: r.temperature,
                beam_size: r.beam_size.and_then(|b| u32::try_from(b).ok()),
            },
            status,
            language_detected: r.language_detected,
            confidence: r.confidence,
            text_full: r.text_full,
            artifacts: r.artifacts.map(|Json(a)| a),
            started_at: r.started_at,
            finished_at: r.finished_at,
        })
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let beam_size = job
            .hints
            .beam_size
            .map(i32::try_from)
            .transpose()
            .map_err(|e| RepositoryError::ConstraintViolation(format!("beam_size: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO transcriptions
                (id, audio_id, mode, status, language_hint, model_name, temperature, beam_size, started_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.audio_id.as_uuid())
        .bind(job.mode.as_str())
        .bind(job.status.as_str())
        .bind(job.hints.language.as_deref())
        .bind(job.hints.model_name.as_deref())
        .bind(job.hints.temperature)
        .bind(beam_size)
        .bind(job.started_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepositoryError::ConstraintViolation(db.to_string())
            }
            other => query_failed(other),
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM transcriptions WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Job::try_from).transpose()
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn mark_running(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "UPDATE transcriptions SET status = 'running' \
             WHERE id = $1 AND status = 'queued' RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Job::try_from).transpose()
    }

    #[instrument(skip(self, outcome), fields(job_id = %id.as_uuid()))]
    async fn mark_succeeded(
        &self,
        id: JobId,
        outcome: &TranscriptionOutcome,
    ) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "UPDATE transcriptions SET status = 'succeeded', language_detected = $2, \
             confidence = $3, text_full = $4, artifacts = $5, finished_at = NOW() \
             WHERE id = $1 RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(&outcome.language_detected)
        .bind(outcome.confidence)
        .bind(&outcome.text_full)
        .bind(Json(&outcome.artifacts))
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Job::try_from).transpose()
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn mark_failed(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "UPDATE transcriptions SET status = 'failed', finished_at = NOW() \
             WHERE id = $1 RETURNING {}",
            JOB_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Job::try_from).transpose()
    }

    #[instrument(skip(self), fields(audio_id = %audio_id.as_uuid()))]
    async fn list_by_audio(
        &self,
        audio_id: AudioId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM transcriptions WHERE audio_id = $1 \
             ORDER BY started_at DESC LIMIT $2 OFFSET $3",
            JOB_COLUMNS
        ))
        .bind(audio_id.as_uuid())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.into_iter().map(Job::try_from).collect()
    }
}
