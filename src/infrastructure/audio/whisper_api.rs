//! Request and response plumbing shared by the OpenAI-compatible engines.

use std::path::Path;

use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{DecodeOptions, RawSegment, RawTranscript, RecognitionError};

#[derive(Debug, Deserialize)]
pub(crate) struct VerboseTranscription {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Option<Vec<VerboseSegment>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerboseSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl VerboseTranscription {
    /// A response without a segment list becomes a single segment spanning
    /// nothing, as long as it carries text.
    pub fn into_raw(self) -> RawTranscript {
        let segments = match self.segments {
            Some(segments) => segments
                .into_iter()
                .map(|s| RawSegment {
                    start: s.start,
                    end: s.end,
                    text: s.text,
                })
                .collect(),
            None if !self.text.trim().is_empty() => vec![RawSegment {
                start: 0.0,
                end: 0.0,
                text: self.text,
            }],
            None => Vec::new(),
        };

        RawTranscript {
            segments,
            language: self
                .language
                .filter(|l| !l.trim().is_empty())
                .map(|l| language_code(&l)),
            language_probability: None,
        }
    }
}

/// Whisper language names as returned in `verbose_json`, keyed to the codes
/// the model itself uses.
const WHISPER_LANGUAGES: &[(&str, &str)] = &[
    ("english", "en"),
    ("chinese", "zh"),
    ("german", "de"),
    ("spanish", "es"),
    ("russian", "ru"),
    ("korean", "ko"),
    ("french", "fr"),
    ("japanese", "ja"),
    ("portuguese", "pt"),
    ("turkish", "tr"),
    ("polish", "pl"),
    ("catalan", "ca"),
    ("dutch", "nl"),
    ("arabic", "ar"),
    ("swedish", "sv"),
    ("italian", "it"),
    ("indonesian", "id"),
    ("hindi", "hi"),
    ("finnish", "fi"),
    ("vietnamese", "vi"),
    ("hebrew", "he"),
    ("ukrainian", "uk"),
    ("greek", "el"),
    ("malay", "ms"),
    ("czech", "cs"),
    ("romanian", "ro"),
    ("danish", "da"),
    ("hungarian", "hu"),
    ("tamil", "ta"),
    ("norwegian", "no"),
    ("thai", "th"),
    ("urdu", "ur"),
    ("croatian", "hr"),
    ("bulgarian", "bg"),
    ("lithuanian", "lt"),
    ("latin", "la"),
    ("maori", "mi"),
    ("malayalam", "ml"),
    ("welsh", "cy"),
    ("slovak", "sk"),
    ("telugu", "te"),
    ("persian", "fa"),
    ("latvian", "lv"),
    ("bengali", "bn"),
    ("serbian", "sr"),
    ("azerbaijani", "az"),
    ("slovenian", "sl"),
    ("kannada", "kn"),
    ("estonian", "et"),
    ("macedonian", "mk"),
    ("breton", "br"),
    ("basque", "eu"),
    ("icelandic", "is"),
    ("armenian", "hy"),
    ("nepali", "ne"),
    ("mongolian", "mn"),
    ("bosnian", "bs"),
    ("kazakh", "kk"),
    ("albanian", "sq"),
    ("swahili", "sw"),
    ("galician", "gl"),
    ("marathi", "mr"),
    ("punjabi", "pa"),
    ("sinhala", "si"),
    ("khmer", "km"),
    ("shona", "sn"),
    ("yoruba", "yo"),
    ("somali", "so"),
    ("afrikaans", "af"),
    ("occitan", "oc"),
    ("georgian", "ka"),
    ("belarusian", "be"),
    ("tajik", "tg"),
    ("sindhi", "sd"),
    ("gujarati", "gu"),
    ("amharic", "am"),
    ("yiddish", "yi"),
    ("lao", "lo"),
    ("uzbek", "uz"),
    ("faroese", "fo"),
    ("haitian creole", "ht"),
    ("pashto", "ps"),
    ("turkmen", "tk"),
    ("nynorsk", "nn"),
    ("maltese", "mt"),
    ("sanskrit", "sa"),
    ("luxembourgish", "lb"),
    ("myanmar", "my"),
    ("tibetan", "bo"),
    ("tagalog", "tl"),
    ("malagasy", "mg"),
    ("assamese", "as"),
    ("tatar", "tt"),
    ("hawaiian", "haw"),
    ("lingala", "ln"),
    ("hausa", "ha"),
    ("bashkir", "ba"),
    ("javanese", "jw"),
    ("sundanese", "su"),
    ("cantonese", "yue"),
];

/// Converts a Whisper language name to its code. Values that are already
/// codes, or that are unknown, pass through lowercased.
pub(crate) fn language_code(value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    WHISPER_LANGUAGES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, code)| code.to_string())
        .unwrap_or(normalized)
}

pub(crate) async fn build_form(
    audio_path: &Path,
    options: &DecodeOptions,
    model: Option<&str>,
) -> Result<multipart::Form, RecognitionError> {
    let audio_data = tokio::fs::read(audio_path).await?;
    let file_name = audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.bin")
        .to_string();

    let file_part = multipart::Part::bytes(audio_data)
        .file_name(file_name)
        .mime_str(mime_for(audio_path))
        .map_err(|e| RecognitionError::ApiRequestFailed(format!("mime: {}", e)))?;

    let mut form = multipart::Form::new()
        .text("response_format", "verbose_json")
        .text("temperature", options.temperature.to_string())
        .part("file", file_part);

    if let Some(model) = model {
        form = form.text("model", model.to_string());
    }
    if let Some(language) = &options.language {
        form = form.text("language", language.clone());
    }
    if options.beam_size != 1 {
        tracing::debug!(
            beam_size = options.beam_size,
            "Beam width is not exposed by the transcription API, ignoring"
        );
    }

    Ok(form)
}

pub(crate) async fn read_response(
    response: reqwest::Response,
) -> Result<RawTranscript, RecognitionError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(RecognitionError::ApiRequestFailed(format!(
            "status {}: {}",
            status, body
        )));
    }

    let result: VerboseTranscription = response
        .json()
        .await
        .map_err(|e| RecognitionError::ApiRequestFailed(format!("parse response: {}", e)))?;

    Ok(result.into_raw())
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}
