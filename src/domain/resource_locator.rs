use std::fmt;
use std::path::Path;

const DEFAULT_SUFFIX: &str = ".bin";

/// Where the bytes of an audio file can be retrieved from: an `http(s)` URL or
/// a path on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    Remote,
    Local,
}

impl ResourceLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> LocatorKind {
        if self.0.starts_with("http://") || self.0.starts_with("https://") {
            LocatorKind::Remote
        } else {
            LocatorKind::Local
        }
    }

    /// File suffix (with the leading dot) for the local working copy, taken
    /// from the last path segment; query and fragment are ignored.
    pub fn suffix(&self) -> String {
        let path = match self.kind() {
            LocatorKind::Remote => {
                let without_query = self.0.split(['?', '#']).next().unwrap_or_default();
                let after_scheme = without_query
                    .split_once("://")
                    .map(|(_, rest)| rest)
                    .unwrap_or(without_query);
                match after_scheme.split_once('/') {
                    Some((_, path)) => path.to_string(),
                    None => String::new(),
                }
            }
            LocatorKind::Local => self.0.clone(),
        };

        Path::new(&path)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
