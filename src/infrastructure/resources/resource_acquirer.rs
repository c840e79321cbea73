use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tempfile::{Builder, TempPath};
use tokio::io::AsyncWriteExt;

use crate::application::ports::{ResourceAcquirer, ResourceError, WorkingCopy};
use crate::domain::{LocatorKind, ResourceLocator};

const TEMP_PREFIX: &str = "s2x_";

/// Fetches `http(s)` locators with a streamed GET and copies local paths,
/// always into a fresh uniquely named temporary file.
pub struct TempFileAcquirer {
    client: reqwest::Client,
    temp_dir: Option<std::path::PathBuf>,
}

impl TempFileAcquirer {
    pub fn new(fetch_timeout: Duration) -> Result<Self, ResourceError> {
        let client = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| ResourceError::RetrievalFailed(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            temp_dir: None,
        })
    }

    /// Places working copies under `dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn create_temp(&self, suffix: &str) -> Result<(std::fs::File, TempPath), ResourceError> {
        let mut builder = Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(suffix);
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file.into_parts())
    }

    async fn download(&self, locator: &ResourceLocator) -> Result<WorkingCopy, ResourceError> {
        let response = self
            .client
            .get(locator.as_str())
            .send()
            .await
            .map_err(|e| ResourceError::RetrievalFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(ResourceError::RetrievalFailed(format!(
                "status {} for {}",
                response.status(),
                locator
            )));
        }

        let (file, path) = self.create_temp(&locator.suffix())?;
        let mut file = tokio::fs::File::from_std(file);
        let mut stream = response.bytes_stream();
        let mut total_bytes: u64 = 0;

        // Dropping `path` on an early return removes the partial file.
        while let Some(chunk) = stream.next().await {
            let bytes =
                chunk.map_err(|e| ResourceError::RetrievalFailed(format!("body: {}", e)))?;
            if bytes.is_empty() {
                continue;
            }
            file.write_all(&bytes).await?;
            total_bytes += bytes.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(bytes = total_bytes, path = %path.display(), "Remote audio downloaded");

        Ok(WorkingCopy::new(path))
    }

    async fn copy_local(&self, locator: &ResourceLocator) -> Result<WorkingCopy, ResourceError> {
        let source = Path::new(locator.as_str());
        if !tokio::fs::try_exists(source).await.unwrap_or(false) {
            return Err(ResourceError::NotFound(locator.to_string()));
        }

        let (file, path) = self.create_temp(&locator.suffix())?;
        let mut file = tokio::fs::File::from_std(file);
        let mut src = tokio::fs::File::open(source).await?;
        let copied = tokio::io::copy(&mut src, &mut file).await?;
        file.flush().await?;

        tracing::debug!(bytes = copied, path = %path.display(), "Local audio copied");

        Ok(WorkingCopy::new(path))
    }
}

#[async_trait]
impl ResourceAcquirer for TempFileAcquirer {
    async fn acquire(&self, locator: &ResourceLocator) -> Result<WorkingCopy, ResourceError> {
        match locator.kind() {
            LocatorKind::Remote => self.download(locator).await,
            LocatorKind::Local => self.copy_local(locator).await,
        }
    }
}
