use std::path::Path;

use async_trait::async_trait;

/// Decoding parameters with defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOptions {
    pub language: Option<String>,
    pub temperature: f32,
    pub beam_size: u32,
}

/// A segment as reported by an engine, offsets in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTranscript {
    pub segments: Vec<RawSegment>,
    pub language: Option<String>,
    pub language_probability: Option<f64>,
}

#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn recognize(
        &self,
        audio_path: &Path,
        options: &DecodeOptions,
    ) -> Result<RawTranscript, RecognitionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("recognition exceeded deadline of {0}s")]
    DeadlineExceeded(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
