use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{
    DecodeOptions, RawTranscript, RecognitionEngine, RecognitionError,
};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::candle_whisper_engine::{CandleWhisperEngine, Precision};
use super::openai_whisper_engine::OpenAiWhisperEngine;

const DEFAULT_AZURE_API_VERSION: &str = "2024-06-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionProvider {
    Local,
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

impl RecognitionProvider {
    /// Local checkpoints go by size; the hosted APIs only serve `whisper-1`.
    pub fn default_model(&self) -> &'static str {
        match self {
            RecognitionProvider::Local => "small",
            RecognitionProvider::OpenAi | RecognitionProvider::Azure => "whisper-1",
        }
    }
}

/// Everything needed to pick and build an engine.
#[derive(Debug, Clone)]
pub struct EngineSpec {
    pub provider: RecognitionProvider,
    pub model: String,
    pub precision: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
}

pub struct RecognitionEngineFactory;

impl RecognitionEngineFactory {
    pub fn create(spec: &EngineSpec) -> Result<Arc<dyn RecognitionEngine>, RecognitionError> {
        match spec.provider {
            RecognitionProvider::Local => {
                let precision = Precision::from_str(&spec.precision)
                    .map_err(RecognitionError::ModelLoadFailed)?;
                let engine = CandleWhisperEngine::new(&spec.model, precision)?;
                Ok(Arc::new(engine))
            }
            RecognitionProvider::OpenAi => {
                let key = require(spec.api_key.as_deref(), "API key required for OpenAI Whisper")?;
                let engine = OpenAiWhisperEngine::new(
                    key.to_string(),
                    spec.base_url.clone(),
                    Some(spec.model.clone()),
                );
                Ok(Arc::new(engine))
            }
            RecognitionProvider::Azure => {
                let key = require(spec.api_key.as_deref(), "API key required for Azure Whisper")?;
                let base_url = require(
                    spec.base_url.as_deref(),
                    "base URL required for Azure Whisper",
                )?;
                let deployment = spec.azure_deployment.as_deref().unwrap_or(&spec.model);
                let api_version = spec
                    .azure_api_version
                    .as_deref()
                    .unwrap_or(DEFAULT_AZURE_API_VERSION);
                let engine = AzureWhisperEngine::new(base_url, deployment, key, api_version);
                Ok(Arc::new(engine))
            }
        }
    }

    /// Engine for deployments that run with recognition switched off. The
    /// pipeline never calls it; any call is an error.
    pub fn disabled() -> Arc<dyn RecognitionEngine> {
        Arc::new(DisabledEngine)
    }
}

struct DisabledEngine;

#[async_trait]
impl RecognitionEngine for DisabledEngine {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn recognize(
        &self,
        _path: &Path,
        _options: &DecodeOptions,
    ) -> Result<RawTranscript, RecognitionError> {
        Err(RecognitionError::TranscriptionFailed(
            "recognition is disabled".to_string(),
        ))
    }
}

fn require<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, RecognitionError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| RecognitionError::ModelLoadFailed(message.to_string()))
}
