mod artifact_repository;
mod artifact_storage;
mod audio_repository;
mod job_repository;
mod recognition_engine;
mod repository_error;
mod resource_acquirer;
mod segment_repository;

pub use artifact_repository::ArtifactRepository;
pub use artifact_storage::{ArtifactStorage, ArtifactStorageError};
pub use audio_repository::AudioRepository;
pub use job_repository::JobRepository;
pub use recognition_engine::{
    DecodeOptions, RawSegment, RawTranscript, RecognitionEngine, RecognitionError,
};
pub use repository_error::RepositoryError;
pub use resource_acquirer::{ResourceAcquirer, ResourceError, WorkingCopy};
pub use segment_repository::SegmentRepository;
