use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ArtifactRepository, RepositoryError};
use crate::domain::{Artifact, ArtifactKind, JobId};

pub struct PgArtifactRepository {
    pool: PgPool,
}

impl PgArtifactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ArtifactRow {
    transcription_id: Uuid,
    kind: String,
    location: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ArtifactRow> for Artifact {
    type Error = RepositoryError;

    fn try_from(r: ArtifactRow) -> Result<Self, Self::Error> {
        Ok(Artifact {
            job_id: JobId::from_uuid(r.transcription_id),
            kind: r.kind.parse().map_err(RepositoryError::QueryFailed)?,
            location: r.location,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl ArtifactRepository for PgArtifactRepository {
    #[instrument(skip(self, location), fields(job_id = %job_id.as_uuid(), kind = %kind))]
    async fn upsert(
        &self,
        job_id: JobId,
        kind: ArtifactKind,
        location: &str,
    ) -> Result<Artifact, RepositoryError> {
        let row = sqlx::query_as::<_, ArtifactRow>(
            r#"
            INSERT INTO transcription_artifacts (transcription_id, kind, location, created_at)
            VALUES ($1, $2, $3, clock_timestamp())
            ON CONFLICT (transcription_id, kind)
            DO UPDATE SET location = EXCLUDED.location, created_at = clock_timestamp()
            RETURNING transcription_id, kind, location, created_at
            "#,
        )
        .bind(job_id.as_uuid())
        .bind(kind.as_str())
        .bind(location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Artifact::try_from(row)
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn list(&self, job_id: JobId) -> Result<Vec<Artifact>, RepositoryError> {
        let rows = sqlx::query_as::<_, ArtifactRow>(
            r#"
            SELECT transcription_id, kind, location, created_at
            FROM transcription_artifacts
            WHERE transcription_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(job_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.into_iter().map(Artifact::try_from).collect()
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid(), kind = %kind))]
    async fn delete(&self, job_id: JobId, kind: ArtifactKind) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM transcription_artifacts WHERE transcription_id = $1 AND kind = $2",
        )
        .bind(job_id.as_uuid())
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
