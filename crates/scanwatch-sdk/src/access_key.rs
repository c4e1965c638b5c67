//! Access key loading.

use crate::error::SdkError;
use std::fmt;
use std::path::Path;

/// Bearer access key for the API
///
/// The key is never printed: `Debug` shows a redacted placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey(String);

impl AccessKey {
    /// Wrap a key, rejecting blank keys
    pub fn new(key: impl Into<String>) -> Result<Self, SdkError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(SdkError::ConfigError("Access key is empty".to_string()));
        }
        Ok(Self(key))
    }

    /// Read the key from the first line of a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SdkError::ConfigError(format!(
                "Failed to read access key file {}: {}",
                path.display(),
                e
            ))
        })?;

        let first_line = contents.lines().next().unwrap_or_default();
        Self::new(first_line).map_err(|_| {
            SdkError::ConfigError(format!("Access key file {} is empty", path.display()))
        })
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessKey(***)")
    }
}
