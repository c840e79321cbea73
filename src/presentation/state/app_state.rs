use std::sync::Arc;

use crate::application::ports::{
    ArtifactRepository, AudioRepository, JobRepository, SegmentRepository,
};
use crate::application::services::TranscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub job_repository: Arc<dyn JobRepository>,
    pub audio_repository: Arc<dyn AudioRepository>,
    pub segment_repository: Arc<dyn SegmentRepository>,
    pub artifact_repository: Arc<dyn ArtifactRepository>,
}
