use transcriptor::application::ports::SegmentRepository;
use transcriptor::domain::{RecognitionHints, Segment};

use crate::helpers::TestPostgres;

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_unordered_segments_when_listed_then_start_order_with_insertion_tie_break() {
    let test_pg = TestPostgres::new().await;
    let job = test_pg.seed_job(RecognitionHints::default()).await;
    let segments = vec![
        Segment::new(job.id, 2000, 2500, "late"),
        Segment::new(job.id, -250, 0, "negative"),
        Segment::new(job.id, 1000, 1800, "tie-a"),
        Segment::new(job.id, 1000, 1200, "tie-b"),
    ];

    let inserted = test_pg
        .segment_repository
        .bulk_insert(job.id, &segments)
        .await
        .unwrap();
    let listed = test_pg.segment_repository.list(job.id, 1000, 0).await.unwrap();

    assert_eq!(inserted, 4);
    let texts: Vec<&str> = listed.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["negative", "tie-a", "tie-b", "late"]);
    assert_eq!(listed[0].start_ms, -250);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn given_segments_when_deleted_by_job_then_count_returned_and_list_empty() {
    let test_pg = TestPostgres::new().await;
    let job = test_pg.seed_job(RecognitionHints::default()).await;
    let segments = vec![
        Segment::new(job.id, 0, 500, "a"),
        Segment::new(job.id, 500, 900, "b"),
    ];
    test_pg
        .segment_repository
        .bulk_insert(job.id, &segments)
        .await
        .unwrap();

    let deleted = test_pg.segment_repository.delete_by_job(job.id).await.unwrap();

    assert_eq!(deleted, 2);
    assert!(test_pg
        .segment_repository
        .list(job.id, 1000, 0)
        .await
        .unwrap()
        .is_empty());
}
