use std::path::Path;

use transcriptor::application::ports::{DecodeOptions, RecognitionEngine, RecognitionError};
use transcriptor::infrastructure::audio::{
    EngineSpec, RecognitionEngineFactory, RecognitionProvider,
};

fn spec(provider: RecognitionProvider) -> EngineSpec {
    EngineSpec {
        provider,
        model: "whisper-1".to_string(),
        precision: "f32".to_string(),
        api_key: None,
        base_url: None,
        azure_deployment: None,
        azure_api_version: None,
    }
}

#[test]
fn given_openai_provider_with_key_when_created_then_engine_named_after_model() {
    let spec = EngineSpec {
        api_key: Some("sk-test".to_string()),
        ..spec(RecognitionProvider::OpenAi)
    };

    let engine = RecognitionEngineFactory::create(&spec).unwrap();

    assert_eq!(engine.name(), "whisper-1");
}

#[test]
fn given_openai_provider_without_key_when_created_then_model_load_failed() {
    let result = RecognitionEngineFactory::create(&spec(RecognitionProvider::OpenAi));

    assert!(matches!(result, Err(RecognitionError::ModelLoadFailed(_))));
}

#[test]
fn given_blank_key_when_created_then_model_load_failed() {
    let spec = EngineSpec {
        api_key: Some("   ".to_string()),
        ..spec(RecognitionProvider::OpenAi)
    };

    let result = RecognitionEngineFactory::create(&spec);

    assert!(matches!(result, Err(RecognitionError::ModelLoadFailed(_))));
}

#[test]
fn given_azure_without_deployment_when_created_then_model_is_used_as_deployment() {
    let spec = EngineSpec {
        api_key: Some("key".to_string()),
        base_url: Some("https://example.openai.azure.com".to_string()),
        ..spec(RecognitionProvider::Azure)
    };

    let engine = RecognitionEngineFactory::create(&spec).unwrap();

    assert_eq!(engine.name(), "whisper-1");
}

#[test]
fn given_azure_without_base_url_when_created_then_model_load_failed() {
    let spec = EngineSpec {
        api_key: Some("key".to_string()),
        ..spec(RecognitionProvider::Azure)
    };

    let result = RecognitionEngineFactory::create(&spec);

    assert!(matches!(result, Err(RecognitionError::ModelLoadFailed(_))));
}

#[test]
fn given_local_provider_with_int8_precision_when_created_then_model_load_failed() {
    let spec = EngineSpec {
        precision: "int8".to_string(),
        ..spec(RecognitionProvider::Local)
    };

    let result = RecognitionEngineFactory::create(&spec);

    assert!(matches!(result, Err(RecognitionError::ModelLoadFailed(_))));
}

#[tokio::test]
async fn given_disabled_engine_when_called_then_transcription_failed() {
    let engine = RecognitionEngineFactory::disabled();
    let options = DecodeOptions {
        language: None,
        temperature: 0.0,
        beam_size: 5,
    };

    let result = engine.recognize(Path::new("/tmp/x.wav"), &options).await;

    assert_eq!(engine.name(), "disabled");
    assert!(matches!(result, Err(RecognitionError::TranscriptionFailed(_))));
}

#[test]
fn given_hosted_providers_when_defaulting_model_then_whisper_1() {
    assert_eq!(RecognitionProvider::OpenAi.default_model(), "whisper-1");
    assert_eq!(RecognitionProvider::Azure.default_model(), "whisper-1");
    assert_eq!(RecognitionProvider::Local.default_model(), "small");
}
