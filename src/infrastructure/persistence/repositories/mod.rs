mod in_memory_repository;
mod pg_artifact_repository;
mod pg_audio_repository;
mod pg_job_repository;
mod pg_segment_repository;

pub use in_memory_repository::{
    InMemoryArtifactRepository, InMemoryAudioRepository, InMemoryJobRepository,
    InMemorySegmentRepository,
};
pub use pg_artifact_repository::PgArtifactRepository;
pub use pg_audio_repository::PgAudioRepository;
pub use pg_job_repository::PgJobRepository;
pub use pg_segment_repository::PgSegmentRepository;
