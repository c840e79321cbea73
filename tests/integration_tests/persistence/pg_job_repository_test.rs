use transcriptor::application::ports::{JobRepository, RepositoryError};
use transcriptor::domain::{
    ArtifactSummary, AudioId, Job, JobMode, JobStatus, RecognitionHints, TranscriptionOutcome,
};

use crate::helpers::TestPostgres;

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_new_job_when_created_and_retrieved_then_hints_round_trip() {
    let test_pg = TestPostgres::new().await;
    let hints = RecognitionHints {
        language: Some("en".to_string()),
        model_name: Some("small".to_string()),
        temperature: Some(0.2),
        beam_size: Some(3),
    };

    let job = test_pg.seed_job(hints.clone()).await;

    let retrieved = test_pg
        .job_repository
        .get_by_id(job.id)
        .await
        .expect("Failed to retrieve job")
        .expect("Job not found");

    assert_eq!(retrieved.id, job.id);
    assert_eq!(retrieved.audio_id, job.audio_id);
    assert_eq!(retrieved.status, JobStatus::Queued);
    assert_eq!(retrieved.mode, JobMode::Batch);
    assert_eq!(retrieved.hints, hints);
    assert!(retrieved.finished_at.is_none());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_job_for_unknown_audio_when_created_then_constraint_violation() {
    let test_pg = TestPostgres::new().await;
    let job = Job::new(AudioId::new(), JobMode::Batch, RecognitionHints::default());

    let result = test_pg.job_repository.create(&job).await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_queued_job_when_marked_running_twice_then_only_first_wins() {
    let test_pg = TestPostgres::new().await;
    let job = test_pg.seed_job(RecognitionHints::default()).await;

    let first = test_pg.job_repository.mark_running(job.id).await.unwrap();
    let second = test_pg.job_repository.mark_running(job.id).await.unwrap();

    assert_eq!(first.map(|j| j.status), Some(JobStatus::Running));
    assert!(second.is_none());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_running_job_when_marked_succeeded_then_outcome_is_stored() {
    let test_pg = TestPostgres::new().await;
    let job = test_pg.seed_job(RecognitionHints::default()).await;
    test_pg.job_repository.mark_running(job.id).await.unwrap();
    let outcome = TranscriptionOutcome {
        language_detected: "en".to_string(),
        confidence: Some(0.91),
        text_full: "Hello world".to_string(),
        artifacts: ArtifactSummary {
            srt: "1\n".to_string(),
            vtt: "WEBVTT\n".to_string(),
            num_segments: 1,
        },
    };

    let updated = test_pg
        .job_repository
        .mark_succeeded(job.id, &outcome)
        .await
        .unwrap()
        .expect("Job not found");

    assert_eq!(updated.status, JobStatus::Succeeded);
    assert_eq!(updated.language_detected.as_deref(), Some("en"));
    assert_eq!(updated.confidence, Some(0.91));
    assert_eq!(updated.text_full.as_deref(), Some("Hello world"));
    assert_eq!(updated.artifacts, Some(outcome.artifacts));
    assert!(updated.finished_at.is_some());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_running_job_when_marked_failed_then_finished_at_is_set() {
    let test_pg = TestPostgres::new().await;
    let job = test_pg.seed_job(RecognitionHints::default()).await;
    test_pg.job_repository.mark_running(job.id).await.unwrap();

    let updated = test_pg
        .job_repository
        .mark_failed(job.id)
        .await
        .unwrap()
        .expect("Job not found");

    assert_eq!(updated.status, JobStatus::Failed);
    assert!(updated.finished_at.is_some());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_jobs_for_audio_when_listed_then_newest_first() {
    let test_pg = TestPostgres::new().await;
    let first = test_pg.seed_job(RecognitionHints::default()).await;
    let mut second = Job::new(first.audio_id, JobMode::Batch, RecognitionHints::default());
    second.started_at = first.started_at + chrono::Duration::seconds(5);
    test_pg.job_repository.create(&second).await.unwrap();

    let listed = test_pg
        .job_repository
        .list_by_audio(first.audio_id, 10, 0)
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}
