mod artifacts;
mod audio;
mod error;
mod health;
mod segments;
mod transcriptions;

pub use artifacts::{delete_artifact_handler, list_artifacts_handler};
pub use audio::create_audio_handler;
pub use error::ErrorResponse;
pub use health::health_handler;
pub use segments::{delete_segments_handler, list_segments_handler};
pub use transcriptions::{
    create_transcription_handler, get_transcription_handler, list_transcriptions_handler,
};
