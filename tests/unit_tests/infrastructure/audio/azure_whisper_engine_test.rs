use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use transcriptor::application::ports::{DecodeOptions, RecognitionEngine, RecognitionError};
use transcriptor::infrastructure::audio::AzureWhisperEngine;

use crate::support::source_file;

async fn start_mock_azure_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/openai/deployments/my-deployment/audio/transcriptions",
        post(move |headers: HeaderMap| async move {
            if headers.get("api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
                return (StatusCode::UNAUTHORIZED, "bad key").into_response();
            }
            let status = StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

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
        language: Some("nb".to_string()),
        temperature: 0.2,
        beam_size: 1,
    }
}

#[tokio::test]
async fn given_valid_audio_when_azure_recognizes_then_returns_segments() {
    let body = r#"{
        "language": "norwegian",
        "text": "Hei verden",
        "segments": [{"start": 0.0, "end": 2.0, "text": "Hei verden"}]
    }"#;
    let (base_url, shutdown_tx) = start_mock_azure_server(200, body).await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");
    let audio = source_file(".wav");

    let transcript = engine.recognize(audio.path(), &options()).await.unwrap();

    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].end, 2.0);
    assert_eq!(transcript.language.as_deref(), Some("no"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_error_status_when_recognizing_then_api_request_failed() {
    let body = r#"{"error": {"code": "InvalidRequest", "message": "bad audio"}}"#;
    let (base_url, shutdown_tx) = start_mock_azure_server(400, body).await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");
    let audio = source_file(".wav");

    let result = engine.recognize(audio.path(), &options()).await;

    assert!(matches!(result, Err(RecognitionError::ApiRequestFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_text_when_recognizing_then_no_segments() {
    let (base_url, shutdown_tx) = start_mock_azure_server(200, r#"{"text": ""}"#).await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");
    let audio = source_file(".wav");

    let transcript = engine.recognize(audio.path(), &options()).await.unwrap();

    assert!(transcript.segments.is_empty());
    shutdown_tx.send(()).ok();
}

#[test]
fn given_deployment_when_constructed_then_name_is_deployment() {
    let engine = AzureWhisperEngine::new("https://x.openai.azure.com/", "whisper-prod", "k", "v");

    assert_eq!(engine.name(), "whisper-prod");
}
