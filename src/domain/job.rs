use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ArtifactSummary, AudioId, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobMode {
    Batch,
}

impl JobMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobMode::Batch => "batch",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "batch" => Some(JobMode::Batch),
            _ => None,
        }
    }
}

/// Optional per-job decoding hints supplied at creation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionHints {
    pub language: Option<String>,
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub beam_size: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub audio_id: AudioId,
    pub mode: JobMode,
    pub hints: RecognitionHints,
    pub status: JobStatus,
    pub language_detected: Option<String>,
    pub confidence: Option<f64>,
    pub text_full: Option<String>,
    pub artifacts: Option<ArtifactSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(audio_id: AudioId, mode: JobMode, hints: RecognitionHints) -> Self {
        Self {
            id: JobId::new(),
            audio_id,
            mode,
            hints,
            status: JobStatus::Queued,
            language_detected: None,
            confidence: None,
            text_full: None,
            artifacts: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Everything recorded on the job row when it transitions to `succeeded`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionOutcome {
    pub language_detected: String,
    pub confidence: Option<f64>,
    pub text_full: String,
    pub artifacts: ArtifactSummary,
}

impl TranscriptionOutcome {
    /// Outcome recorded when recognition is disabled process-wide.
    pub fn empty() -> Self {
        Self {
            language_detected: String::new(),
            confidence: None,
            text_full: String::new(),
            artifacts: ArtifactSummary::empty(),
        }
    }
}
