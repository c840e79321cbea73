use super::JobId;

/// One timed span of recognized text. Offsets are integer milliseconds and
/// may be negative or overlap; nothing here validates ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub job_id: JobId,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
    pub speaker_label: Option<String>,
    pub confidence: Option<f64>,
}

impl Segment {
    pub fn new(job_id: JobId, start_ms: i64, end_ms: i64, text: impl Into<String>) -> Self {
        Self {
            job_id,
            start_ms,
            end_ms,
            text: text.into(),
            speaker_label: None,
            confidence: None,
        }
    }
}
