mod artifact_publisher;
mod recognition_adapter;
mod subtitle_builder;
mod timestamp;
mod transcription_pipeline;
mod transcription_service;
mod transcription_worker;

pub use artifact_publisher::{ArtifactPublisher, artifact_key};
pub use recognition_adapter::{
    DEFAULT_BEAM_SIZE, DEFAULT_TEMPERATURE, Recognition, RecognitionAdapter, RecognizedSegment,
    decode_options, normalize,
};
pub use subtitle_builder::{build_srt, build_summary, build_vtt};
pub use timestamp::{format_srt_timestamp, format_vtt_timestamp};
pub use transcription_pipeline::{
    PipelineConfig, PipelineError, ProcessOutcome, TranscriptionPipeline,
};
pub use transcription_service::{SubmitError, TranscriptionService};
pub use transcription_worker::TranscriptionWorker;
