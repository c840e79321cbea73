use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{
    DecodeOptions, RawTranscript, RecognitionEngine, RecognitionError,
};

use super::whisper_api::{build_form, read_response};

pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[async_trait]
impl RecognitionEngine for OpenAiWhisperEngine {
    fn name(&self) -> &str {
        &self.model
    }

    async fn recognize(
        &self,
        audio_path: &Path,
        options: &DecodeOptions,
    ) -> Result<RawTranscript, RecognitionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let form = build_form(audio_path, options, Some(&self.model)).await?;

        tracing::debug!(model = %self.model, "Sending audio to OpenAI Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::ApiRequestFailed(format!("request: {}", e)))?;

        let transcript = read_response(response).await?;

        tracing::info!(
            segments = transcript.segments.len(),
            "OpenAI Whisper transcription completed"
        );

        Ok(transcript)
    }
}
