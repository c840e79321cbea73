use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{AudioRepository, RepositoryError};
use crate::domain::{AudioFile, AudioId, ResourceLocator};

pub struct PgAudioRepository {
    pool: PgPool,
}

impl PgAudioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AudioRepository for PgAudioRepository {
    #[instrument(skip(self, audio), fields(audio_id = %audio.id.as_uuid()))]
    async fn create(&self, audio: &AudioFile) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO audio_files (id, resource_locator, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(audio.id.as_uuid())
        .bind(audio.resource_locator.as_str())
        .bind(audio.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(audio_id = %id.as_uuid()))]
    async fn get(&self, id: AudioId) -> Result<Option<AudioFile>, RepositoryError> {
        let row: Option<(Uuid, String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, resource_locator, created_at
            FROM audio_files
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(row.map(|(id, locator, created_at)| AudioFile {
            id: AudioId::from_uuid(id),
            resource_locator: ResourceLocator::new(locator),
            created_at,
        }))
    }
}
