use std::sync::Arc;

use tokio::sync::mpsc;

use transcriptor::application::ports::{AudioRepository, JobRepository};
use transcriptor::application::services::{SubmitError, TranscriptionService};
use transcriptor::domain::{
    AudioFile, AudioId, JobId, JobMode, JobStatus, RecognitionHints, ResourceLocator,
};

use crate::support::Harness;

fn service(harness: &Harness, sender: mpsc::Sender<JobId>) -> TranscriptionService {
    TranscriptionService::new(harness.jobs.clone(), harness.audio.clone(), sender)
}

#[tokio::test]
async fn given_known_audio_when_submitted_then_queued_job_is_enqueued() {
    let harness = Harness::new();
    let audio = AudioFile::new(ResourceLocator::new("https://cdn.example.com/talk.mp3"));
    harness.audio.create(&audio).await.unwrap();
    let (sender, mut receiver) = mpsc::channel(4);
    let service = service(&harness, sender);

    let hints = RecognitionHints {
        language: Some("en".to_string()),
        ..RecognitionHints::default()
    };
    let job = service.submit(audio.id, JobMode::Batch, hints.clone()).await.unwrap();

    assert_eq!(job.status, JobStatus::Queued);
    assert_eq!(receiver.recv().await, Some(job.id));
    let stored = harness.jobs.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.audio_id, audio.id);
    assert_eq!(stored.hints, hints);
}

#[tokio::test]
async fn given_unknown_audio_when_submitted_then_audio_not_found_and_nothing_enqueued() {
    let harness = Harness::new();
    let (sender, mut receiver) = mpsc::channel(4);
    let service = service(&harness, sender);

    let result = service
        .submit(AudioId::new(), JobMode::Batch, RecognitionHints::default())
        .await;

    assert!(matches!(result, Err(SubmitError::AudioNotFound(_))));
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn given_closed_queue_when_submitted_then_job_is_failed_instead_of_left_queued() {
    let harness = Harness::new();
    let audio = AudioFile::new(ResourceLocator::new("/srv/audio/a.wav"));
    harness.audio.create(&audio).await.unwrap();
    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);
    let service = Arc::new(service(&harness, sender));

    let result = service
        .submit(audio.id, JobMode::Batch, RecognitionHints::default())
        .await;

    let job_id = match result {
        Err(SubmitError::QueueClosed(job_id)) => job_id,
        other => panic!("expected QueueClosed, got {:?}", other.map(|job| job.id)),
    };
    let stored = harness.jobs.get_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert!(stored.finished_at.is_some());
}
