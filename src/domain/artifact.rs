use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Srt,
    Vtt,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Srt, ArtifactKind::Vtt];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Srt => "srt",
            ArtifactKind::Vtt => "vtt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Srt => "application/x-subrip",
            ArtifactKind::Vtt => "text/vtt",
        }
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "srt" => Ok(ArtifactKind::Srt),
            "vtt" => Ok(ArtifactKind::Vtt),
            _ => Err(format!("Invalid artifact kind: {}", s)),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted pointer to a published artifact. Unique per `(job_id, kind)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub job_id: JobId,
    pub kind: ArtifactKind,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Structured summary stored on the job row on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub srt: String,
    pub vtt: String,
    pub num_segments: usize,
}

impl ArtifactSummary {
    pub fn empty() -> Self {
        Self {
            srt: String::new(),
            vtt: String::new(),
            num_segments: 0,
        }
    }

    pub fn body(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Srt => &self.srt,
            ArtifactKind::Vtt => &self.vtt,
        }
    }
}
