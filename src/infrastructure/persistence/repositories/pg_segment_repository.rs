use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{RepositoryError, SegmentRepository};
use crate::domain::{JobId, Segment};

pub struct PgSegmentRepository {
    pool: PgPool,
}

impl PgSegmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SegmentRow {
    start_ms: i64,
    end_ms: i64,
    speaker_label: Option<String>,
    text: String,
    confidence: Option<f64>,
}

#[async_trait]
impl SegmentRepository for PgSegmentRepository {
    #[instrument(skip(self, segments), fields(job_id = %job_id.as_uuid(), count = segments.len()))]
    async fn bulk_insert(
        &self,
        job_id: JobId,
        segments: &[Segment],
    ) -> Result<u64, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        let mut count: u64 = 0;
        for seg in segments {
            sqlx::query(
                r#"
                INSERT INTO segments (transcription_id, start_ms, end_ms, speaker_label, text, confidence)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(job_id.as_uuid())
            .bind(seg.start_ms)
            .bind(seg.end_ms)
            .bind(seg.speaker_label.as_deref())
            .bind(&seg.text)
            .bind(seg.confidence)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
            count += 1;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(count)
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn list(
        &self,
        job_id: JobId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Segment>, RepositoryError> {
        let rows = sqlx::query_as::<_, SegmentRow>(
            r#"
            SELECT start_ms, end_ms, speaker_label, text, confidence
            FROM segments
            WHERE transcription_id = $1
            ORDER BY start_ms ASC, seq ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(job_id.as_uuid())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| Segment {
                job_id,
                start_ms: r.start_ms,
                end_ms: r.end_ms,
                text: r.text,
                speaker_label: r.speaker_label,
                confidence: r.confidence,
            })
            .collect())
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn delete_by_job(&self, job_id: JobId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM segments WHERE transcription_id = $1")
            .bind(job_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
