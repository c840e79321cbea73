use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use transcriptor::application::ports::{DecodeOptions, RecognitionEngine, RecognitionError};
use transcriptor::infrastructure::audio::OpenAiWhisperEngine;

use crate::support::source_file;

async fn start_mock_openai_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/v1/audio/transcriptions",
        post(move |headers: HeaderMap| async move {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "Bearer test-key");
            if !authorized {
                return (StatusCode::UNAUTHORIZED, "missing bearer token").into_response();
            }
            let status = StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/v1", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn options() -> DecodeOptions {
    DecodeOptions {
        language: None,
        temperature: 0.0,
        beam_size: 5,
    }
}

#[tokio::test]
async fn given_verbose_json_response_when_recognizing_then_segments_and_language_are_mapped() {
    let body = r#"{
        "language": "english",
        "text": "Hello world",
        "segments": [
            {"id": 0, "start": 0.0, "end": 1.5, "text": " Hello"},
            {"id": 1, "start": 1.5, "end": 3.25, "text": " world"}
        ]
    }"#;
    let (base_url, shutdown_tx) = start_mock_openai_server(200, body).await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);
    let audio = source_file(".wav");

    let transcript = engine.recognize(audio.path(), &options()).await.unwrap();

    assert_eq!(transcript.segments.len(), 2);
    assert_eq!(transcript.segments[1].start, 1.5);
    assert_eq!(transcript.segments[1].end, 3.25);
    assert_eq!(transcript.segments[0].text, " Hello");
    assert_eq!(transcript.language.as_deref(), Some("en"));
    assert_eq!(transcript.language_probability, None);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_response_without_segments_when_recognizing_then_text_becomes_one_segment() {
    let (base_url, shutdown_tx) = start_mock_openai_server(200, r#"{"text": "just text"}"#).await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);
    let audio = source_file(".mp3");

    let transcript = engine.recognize(audio.path(), &options()).await.unwrap();

    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].text, "just text");
    assert_eq!(transcript.language, None);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_error_status_when_recognizing_then_api_request_failed() {
    let (base_url, shutdown_tx) =
        start_mock_openai_server(500, r#"{"error": {"message": "boom"}}"#).await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);
    let audio = source_file(".wav");

    let result = engine.recognize(audio.path(), &options()).await;

    assert!(matches!(result, Err(RecognitionError::ApiRequestFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_wrong_api_key_when_recognizing_then_api_request_failed() {
    let (base_url, shutdown_tx) = start_mock_openai_server(200, r#"{"text": "x"}"#).await;
    let engine = OpenAiWhisperEngine::new("other-key".to_string(), Some(base_url), None);
    let audio = source_file(".wav");

    let result = engine.recognize(audio.path(), &options()).await;

    assert!(matches!(result, Err(RecognitionError::ApiRequestFailed(msg)) if msg.contains("401")));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_audio_file_when_recognizing_then_io_error() {
    let engine = OpenAiWhisperEngine::new(
        "test-key".to_string(),
        Some("http://127.0.0.1:9".to_string()),
        None,
    );

    let result = engine
        .recognize(std::path::Path::new("/no/such/file.wav"), &options())
        .await;

    assert!(matches!(result, Err(RecognitionError::Io(_))));
}

#[test]
fn given_no_model_when_constructed_then_name_is_whisper_1() {
    let engine = OpenAiWhisperEngine::new("k".to_string(), None, None);

    assert_eq!(engine.name(), "whisper-1");
}
