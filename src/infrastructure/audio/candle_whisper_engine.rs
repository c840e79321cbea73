use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{
    DecodeOptions, RawSegment, RawTranscript, RecognitionEngine, RecognitionError,
};

use super::audio_decoder::{TARGET_SAMPLE_RATE, decode_audio_file};

const MEL_FILTERS_REPO: &str = "FL33TW00D-HF/whisper-base";
const MAX_DECODE_TOKENS: usize = 224;
const SAMPLING_SEED: u64 = 299_792_458;

/// Numeric precision the weights are loaded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    F32,
    F16,
    Bf16,
}

impl Precision {
    pub fn dtype(&self) -> DType {
        match self {
            Precision::F32 => DType::F32,
            Precision::F16 => DType::F16,
            Precision::Bf16 => DType::BF16,
        }
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f32" | "float32" => Ok(Precision::F32),
            "f16" | "float16" => Ok(Precision::F16),
            "bf16" | "bfloat16" => Ok(Precision::Bf16),
            other => Err(format!(
                "Unsupported precision: {}. Expected: f32, f16 or bf16",
                other
            )),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Precision::F32 => "f32",
            Precision::F16 => "f16",
            Precision::Bf16 => "bf16",
        };
        f.write_str(s)
    }
}

/// Short names such as `small` resolve to the upstream `openai/whisper-*`
/// checkpoints; anything containing a `/` is used as a hub id verbatim.
pub fn resolve_model_id(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("openai/whisper-{}", name)
    }
}

pub struct CandleWhisperEngine {
    model_id: String,
    runtime: Arc<WhisperRuntime>,
}

/// Everything inference needs, shared with the blocking decode task.
struct WhisperRuntime {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    dtype: DType,
    mel_filters: Vec<f32>,
}

impl CandleWhisperEngine {
    pub fn new(model_name: &str, precision: Precision) -> Result<Self, RecognitionError> {
        let model_id = resolve_model_id(model_name);
        let device = Device::cuda_if_available(0).unwrap_or(Device::Cpu);
        let dtype = Self::select_dtype(&device, precision);

        tracing::info!(
            device = ?device,
            model = %model_id,
            precision = %precision,
            dtype = ?dtype,
            "Initializing Candle Whisper recognition engine"
        );

        let api = Api::new().map_err(|e| RecognitionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.clone(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            RecognitionError::ModelLoadFailed(format!("model.safetensors: {}", e))
        })?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let mel_file = if config.num_mel_bins == 128 {
            "melfilters128.bytes"
        } else {
            "melfilters.bytes"
        };
        let mel_bytes_path = api
            .repo(Repo::new(MEL_FILTERS_REPO.to_string(), RepoType::Model))
            .get(mel_file)
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("{}: {}", mel_file, e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        let mel_bytes = std::fs::read(&mel_bytes_path)
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, &device)
                .map_err(|e| RecognitionError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| RecognitionError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!("Candle Whisper engine loaded successfully");

        Ok(Self {
            model_id,
            runtime: Arc::new(WhisperRuntime {
                model: Mutex::new(model),
                tokenizer,
                config,
                device,
                dtype,
                mel_filters,
            }),
        })
    }

    /// Half precision is only honoured on accelerators; the CPU backend runs
    /// Whisper in `f32`.
    pub fn select_dtype(device: &Device, precision: Precision) -> DType {
        if device.is_cpu() {
            DType::F32
        } else {
            precision.dtype()
        }
    }
}

#[async_trait]
impl RecognitionEngine for CandleWhisperEngine {
    fn name(&self) -> &str {
        &self.model_id
    }

    async fn recognize(
        &self,
        audio_path: &Path,
        options: &DecodeOptions,
    ) -> Result<RawTranscript, RecognitionError> {
        if options.beam_size > 1 {
            tracing::debug!(
                beam_size = options.beam_size,
                "Beam search not available locally, decoding greedily"
            );
        }

        let runtime = Arc::clone(&self.runtime);
        let path = audio_path.to_path_buf();
        let language = options.language.clone();
        let temperature = (options.temperature > 0.0).then_some(options.temperature as f64);

        let segments = tokio::task::spawn_blocking(move || {
            run_transcription(&runtime, &path, language.as_deref(), temperature)
        })
        .await
        .map_err(|e| RecognitionError::TranscriptionFailed(format!("inference task: {}", e)))??;

        Ok(RawTranscript {
            segments,
            language: options.language.clone(),
            language_probability: None,
        })
    }
}

impl WhisperRuntime {
    fn mel_tensor(&self, chunk: &[f32]) -> Result<Tensor, RecognitionError> {
        let mut samples = chunk.to_vec();
        samples.resize(m::N_SAMPLES, 0.0);

        let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
        let n_mel = self.config.num_mel_bins;
        let n_frames = mel_data.len() / n_mel;

        Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
            .and_then(|t| t.to_dtype(self.dtype))
            .map_err(|e| RecognitionError::TranscriptionFailed(format!("mel tensor: {}", e)))
    }

    fn prompt_tokens(&self, language: Option<&str>) -> Result<Vec<u32>, RecognitionError> {
        let mut tokens = vec![token_id(&self.tokenizer, m::SOT_TOKEN)?];
        if let Some(language) = language {
            match self.tokenizer.token_to_id(&format!("<|{}|>", language)) {
                Some(id) => tokens.push(id),
                None => {
                    tracing::warn!(language, "Language token not in vocabulary, ignoring hint")
                }
            }
        }
        tokens.push(token_id(&self.tokenizer, m::TRANSCRIBE_TOKEN)?);
        tokens.push(token_id(&self.tokenizer, m::NO_TIMESTAMPS_TOKEN)?);
        Ok(tokens)
    }
}

/// Runs on a blocking thread: decode, resample and transcribe one window of
/// 30 s at a time.
fn run_transcription(
    runtime: &WhisperRuntime,
    audio_path: &Path,
    language: Option<&str>,
    temperature: Option<f64>,
) -> Result<Vec<RawSegment>, RecognitionError> {
    let pcm = decode_audio_file(audio_path)?;

    let total_secs = pcm.len() as f64 / TARGET_SAMPLE_RATE as f64;
    let window_secs = m::N_SAMPLES as f64 / TARGET_SAMPLE_RATE as f64;
    let prompt = runtime.prompt_tokens(language)?;
    let mut sampler = LogitsProcessor::new(SAMPLING_SEED, temperature, None);

    let mut segments: Vec<RawSegment> = Vec::new();
    let mut model = runtime.model.blocking_lock();

    for (i, chunk) in pcm.chunks(m::N_SAMPLES).enumerate() {
        tracing::debug!(segment = i, "Transcribing audio window");
        let mel = runtime.mel_tensor(chunk)?;
        let text = decode_window(
            &mut model,
            &runtime.tokenizer,
            &runtime.device,
            &mel,
            &prompt,
            &mut sampler,
        )?;
        if text.is_empty() {
            continue;
        }
        let start = i as f64 * window_secs;
        segments.push(RawSegment {
            start,
            end: (start + window_secs).min(total_secs),
            text,
        });
    }

    tracing::info!(
        segments = segments.len(),
        duration_secs = total_secs,
        "Local Whisper transcription completed"
    );

    Ok(segments)
}

fn decode_window(
    model: &mut m::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    mel: &Tensor,
    prompt: &[u32],
    sampler: &mut LogitsProcessor,
) -> Result<String, RecognitionError> {
    let eot_token = token_id(tokenizer, m::EOT_TOKEN)?;

    let audio_features = model
        .encoder
        .forward(mel, true)
        .map_err(|e| RecognitionError::TranscriptionFailed(format!("encoder: {}", e)))?;

    let mut tokens = prompt.to_vec();
    let mut generated: Vec<u32> = Vec::new();

    for _ in 0..MAX_DECODE_TOKENS {
        let token_tensor = Tensor::new(tokens.as_slice(), device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;

        let decoder_output = model
            .decoder
            .forward(&token_tensor, &audio_features, tokens.len() == prompt.len())
            .map_err(|e| RecognitionError::TranscriptionFailed(format!("decoder: {}", e)))?;

        let logits = decoder_output
            .squeeze(0)
            .and_then(|out| model.decoder.final_linear(&out))
            .map_err(|e| RecognitionError::TranscriptionFailed(format!("linear: {}", e)))?;

        let seq_len = logits
            .dim(0)
            .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;
        let last_logits = logits
            .get(seq_len - 1)
            .map_err(|e| RecognitionError::TranscriptionFailed(e.to_string()))?;

        let next_token = sampler
            .sample(&last_logits)
            .map_err(|e| RecognitionError::TranscriptionFailed(format!("sample: {}", e)))?;

        if next_token == eot_token {
            break;
        }

        tokens.push(next_token);
        generated.push(next_token);
    }

    model.reset_kv_cache();

    let text = tokenizer
        .decode(&generated, true)
        .map_err(|e| RecognitionError::TranscriptionFailed(format!("detokenize: {}", e)))?;

    Ok(text.trim().to_string())
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, RecognitionError> {
    tokenizer.token_to_id(token).ok_or_else(|| {
        RecognitionError::TranscriptionFailed(format!("token not found: {}", token))
    })
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, RecognitionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(RecognitionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}
