mod artifact;
mod audio_file;
mod job;
mod job_status;
mod resource_locator;
mod segment;

pub use artifact::{Artifact, ArtifactKind, ArtifactSummary};
pub use audio_file::{AudioFile, AudioId};
pub use job::{Job, JobId, JobMode, RecognitionHints, TranscriptionOutcome};
pub use job_status::JobStatus;
pub use resource_locator::{LocatorKind, ResourceLocator};
pub use segment::Segment;
