mod pg_job_repository_test;
mod pg_segment_repository_test;
