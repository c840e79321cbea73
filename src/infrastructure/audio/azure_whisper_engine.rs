use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{
    DecodeOptions, RawTranscript, RecognitionEngine, RecognitionError,
};

use super::whisper_api::{build_form, read_response};

pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_key: String,
}

impl AzureWhisperEngine {
    pub fn new(base_url: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        let endpoint = format!(
            "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        Self {
            client: reqwest::Client::new(),
            endpoint,
            deployment: deployment.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl RecognitionEngine for AzureWhisperEngine {
    fn name(&self) -> &str {
        &self.deployment
    }

    async fn recognize(
        &self,
        audio_path: &Path,
        options: &DecodeOptions,
    ) -> Result<RawTranscript, RecognitionError> {
        let form = build_form(audio_path, options, None).await?;

        tracing::debug!(endpoint = %self.endpoint, "Sending audio to Azure OpenAI Whisper");

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::ApiRequestFailed(format!("request: {}", e)))?;

        let transcript = read_response(response).await?;

        tracing::info!(
            segments = transcript.segments.len(),
            "Azure OpenAI Whisper transcription completed"
        );

        Ok(transcript)
    }
}
