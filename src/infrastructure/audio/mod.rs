pub mod audio_decoder;
mod azure_whisper_engine;
mod candle_whisper_engine;
mod openai_whisper_engine;
mod recognition_engine_factory;
mod whisper_api;

pub use azure_whisper_engine::AzureWhisperEngine;
pub use candle_whisper_engine::{CandleWhisperEngine, Precision, resolve_model_id};
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use recognition_engine_factory::{EngineSpec, RecognitionEngineFactory, RecognitionProvider};
