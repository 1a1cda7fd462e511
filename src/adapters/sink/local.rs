//! Local filesystem sink

use crate::adapters::sink::traits::FileSink;
use crate::domain::errors::SinkError;
use crate::domain::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Writes bulk files under a root directory, creating publication
/// subdirectories as needed.
#[derive(Debug, Clone)]
pub struct LocalFileSink {
    root: PathBuf,
}

impl LocalFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this sink writes under
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl FileSink for LocalFileSink {
    async fn write(&self, key: &str, contents: &[u8]) -> Result<()> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SinkError::WriteFailed {
                    key: key.to_string(),
                    message: format!("Failed to create {}: {e}", parent.display()),
                }
            })?;
        }

        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| SinkError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(key = key, bytes = contents.len(), "Wrote bulk file");
        Ok(())
    }
}
