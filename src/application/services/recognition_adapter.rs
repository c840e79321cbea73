use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    DecodeOptions, RawTranscript, RecognitionEngine, RecognitionError,
};
use crate::domain::RecognitionHints;

pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_BEAM_SIZE: u32 = 5;

/// A normalized segment: integer milliseconds and trimmed text.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSegment {
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub segments: Vec<RecognizedSegment>,
    pub language: String,
    pub confidence: Option<f64>,
    pub text_full: String,
}

/// Runs the configured engine and normalizes whatever it reports. Knows
/// nothing about jobs or persistence.
pub struct RecognitionAdapter {
    engine: Arc<dyn RecognitionEngine>,
}

impl RecognitionAdapter {
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub async fn recognize(
        &self,
        audio_path: &Path,
        hints: &RecognitionHints,
    ) -> Result<Recognition, RecognitionError> {
        let options = decode_options(hints);

        tracing::debug!(
            engine = %self.engine.name(),
            language = ?options.language,
            temperature = options.temperature,
            beam_size = options.beam_size,
            "Starting recognition"
        );

        let raw = self.engine.recognize(audio_path, &options).await?;
        let recognition = normalize(raw, options.language.as_deref());

        tracing::info!(
            segments = recognition.segments.len(),
            chars = recognition.text_full.len(),
            language = %recognition.language,
            "Recognition completed"
        );

        Ok(recognition)
    }
}

pub fn decode_options(hints: &RecognitionHints) -> DecodeOptions {
    DecodeOptions {
        language: hints.language.clone().filter(|l| !l.trim().is_empty()),
        temperature: hints.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        beam_size: hints.beam_size.unwrap_or(DEFAULT_BEAM_SIZE),
    }
}

pub fn normalize(raw: RawTranscript, language_hint: Option<&str>) -> Recognition {
    let segments: Vec<RecognizedSegment> = raw
        .segments
        .into_iter()
        .map(|seg| RecognizedSegment {
            start_ms: seconds_to_ms(seg.start),
            end_ms: seconds_to_ms(seg.end),
            text: seg.text.trim().to_string(),
        })
        .collect();

    let text_full = segments
        .iter()
        .map(|s| s.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let language = raw
        .language
        .filter(|l| !l.is_empty())
        .or_else(|| language_hint.map(str::to_string))
        .unwrap_or_default();

    Recognition {
        segments,
        language,
        confidence: raw.language_probability,
        text_full,
    }
}

// Truncates toward zero, like an integer cast of the scaled value.
fn seconds_to_ms(seconds: f64) -> i64 {
    (seconds * 1000.0) as i64
}
