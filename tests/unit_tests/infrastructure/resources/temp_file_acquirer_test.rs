use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use bytes::Bytes;
use futures::StreamExt;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use transcriptor::application::ports::{ResourceAcquirer, ResourceError};
use transcriptor::domain::ResourceLocator;
use transcriptor::infrastructure::resources::TempFileAcquirer;

use crate::support::source_file;

const AUDIO_BYTES: &[u8] = b"ID3 not really an mp3 but close enough";

async fn start_mock_audio_host() -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new()
        .route("/media/clip.mp3", get(|| async { AUDIO_BYTES }))
        .route(
            "/media/gone.wav",
            get(|| async { (StatusCode::NOT_FOUND, "no such object").into_response() }),
        )
        .route("/media/truncated.wav", get(|| async { truncated_body() }));

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

/// Sends one chunk, then fails the body so the connection is cut mid-stream.
fn truncated_body() -> Body {
    let chunks = futures::stream::iter([
        Ok::<Bytes, std::io::Error>(Bytes::from_static(AUDIO_BYTES)),
        Err(std::io::Error::other("upstream reset")),
    ])
    .then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        chunk
    });
    Body::from_stream(chunks)
}

fn acquirer_in(dir: &std::path::Path) -> TempFileAcquirer {
    TempFileAcquirer::new(Duration::from_secs(5))
        .unwrap()
        .with_temp_dir(dir)
}

fn entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[tokio::test]
async fn given_remote_locator_when_acquired_then_body_is_streamed_to_suffixed_temp_file() {
    let (base_url, shutdown_tx) = start_mock_audio_host().await;
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let locator = ResourceLocator::new(format!("{}/media/clip.mp3?sig=abc", base_url));

    let copy = acquirer.acquire(&locator).await.unwrap();

    let name = copy.path().file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("s2x_"));
    assert!(name.ends_with(".mp3"));
    assert_eq!(std::fs::read(copy.path()).unwrap(), AUDIO_BYTES);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_remote_not_found_when_acquired_then_retrieval_failed_and_no_file_left() {
    let (base_url, shutdown_tx) = start_mock_audio_host().await;
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let locator = ResourceLocator::new(format!("{}/media/gone.wav", base_url));

    let result = acquirer.acquire(&locator).await;

    assert!(matches!(result, Err(ResourceError::RetrievalFailed(_))));
    assert_eq!(entries(dir.path()), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_body_error_mid_stream_when_acquired_then_partial_file_is_removed() {
    let (base_url, shutdown_tx) = start_mock_audio_host().await;
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let locator = ResourceLocator::new(format!("{}/media/truncated.wav", base_url));

    let result = acquirer.acquire(&locator).await;

    assert!(matches!(result, Err(ResourceError::RetrievalFailed(_))));
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("s2x_"))
        .count();
    assert_eq!(leftovers, 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_host_when_acquired_then_retrieval_failed() {
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let locator = ResourceLocator::new("http://127.0.0.1:9/clip.wav");

    let result = acquirer.acquire(&locator).await;

    assert!(matches!(result, Err(ResourceError::RetrievalFailed(_))));
    assert_eq!(entries(dir.path()), 0);
}

#[tokio::test]
async fn given_local_path_when_acquired_then_private_copy_is_made() {
    let source = source_file(".flac");
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let locator = ResourceLocator::new(source.path().to_str().unwrap());

    let copy = acquirer.acquire(&locator).await.unwrap();

    assert_ne!(copy.path(), source.path());
    assert!(copy.path().starts_with(dir.path()));
    assert!(copy.path().to_str().unwrap().ends_with(".flac"));
    assert_eq!(
        std::fs::read(copy.path()).unwrap(),
        std::fs::read(source.path()).unwrap()
    );
}

#[tokio::test]
async fn given_missing_local_path_when_acquired_then_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let locator = ResourceLocator::new("/var/empty/nothing-here.ogg");

    let result = acquirer.acquire(&locator).await;

    assert!(matches!(result, Err(ResourceError::NotFound(_))));
    assert_eq!(entries(dir.path()), 0);
}

#[tokio::test]
async fn given_working_copy_when_released_then_file_is_deleted() {
    let source = source_file(".wav");
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let copy = acquirer
        .acquire(&ResourceLocator::new(source.path().to_str().unwrap()))
        .await
        .unwrap();
    let path = copy.path().to_path_buf();

    copy.release().unwrap();

    assert!(!path.exists());
    assert!(source.path().exists());
}

#[tokio::test]
async fn given_working_copy_when_dropped_then_file_is_deleted() {
    let source = source_file(".wav");
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let copy = acquirer
        .acquire(&ResourceLocator::new(source.path().to_str().unwrap()))
        .await
        .unwrap();
    let path = copy.path().to_path_buf();

    drop(copy);

    assert!(!path.exists());
}

#[tokio::test]
async fn given_locator_without_extension_when_acquired_then_bin_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let acquirer = acquirer_in(dir.path());
    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("recording");
    std::fs::write(&source, b"raw").unwrap();

    let copy = acquirer
        .acquire(&ResourceLocator::new(source.to_str().unwrap()))
        .await
        .unwrap();

    assert!(copy.path().to_str().unwrap().ends_with(".bin"));
}
