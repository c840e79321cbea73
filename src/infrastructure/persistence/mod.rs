mod pg_pool;
mod repositories;

pub use repositories::{
    InMemoryArtifactRepository, InMemoryAudioRepository, InMemoryJobRepository,
    InMemorySegmentRepository, PgArtifactRepository, PgAudioRepository, PgJobRepository,
    PgSegmentRepository,
};

pub use pg_pool::create_pool;
