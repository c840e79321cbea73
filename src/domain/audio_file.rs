use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ResourceLocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioId(Uuid);

impl AudioId {
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

impl Default for AudioId {
    fn default() -> Self {
        Self::new()
    }
}

/// The slice of the audio record the pipeline cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub id: AudioId,
    pub resource_locator: ResourceLocator,
    pub created_at: DateTime<Utc>,
}

impl AudioFile {
    pub fn new(resource_locator: ResourceLocator) -> Self {
        Self {
            id: AudioId::new(),
            resource_locator,
            created_at: Utc::now(),
        }
    }
}
