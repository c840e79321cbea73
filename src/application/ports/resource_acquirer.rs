use std::io;
use std::path::Path;

use async_trait::async_trait;
use tempfile::TempPath;

use crate::domain::ResourceLocator;

/// A private local copy of an audio resource. The file is removed when the
/// copy is released or dropped.
#[derive(Debug)]
pub struct WorkingCopy {
    path: TempPath,
}

impl WorkingCopy {
    pub fn new(path: TempPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file. A failure here is reported but never fatal to the
    /// caller.
    pub fn release(self) -> io::Result<()> {
        self.path.close()
    }
}

#[async_trait]
pub trait ResourceAcquirer: Send + Sync {
    async fn acquire(&self, locator: &ResourceLocator) -> Result<WorkingCopy, ResourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
