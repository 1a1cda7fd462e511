//! File sink traits

use crate::domain::Result;
use async_trait::async_trait;

/// Destination for finished bulk files
///
/// Keys are relative paths of the form `{publication}/{file}.ndjson`.
/// Writes replace whole files; a rebuild overwrites the previous build's
/// output.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Write one finished bulk file.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::WriteFailed`] if the file cannot be written.
    ///
    /// [`SinkError::WriteFailed`]: crate::domain::errors::SinkError::WriteFailed
    async fn write(&self, key: &str, contents: &[u8]) -> Result<()>;
}
