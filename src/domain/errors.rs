//! Domain error types
//!
//! This module defines the error hierarchy for Bulkward. All errors are
//! domain-specific and don't expose third-party types. The taxonomy keeps the
//! expected contention outcome (`AlreadyClaimed`) distinct from
//! infrastructure failures (`ClaimFailed`, `SelectionFailed`, provider
//! errors) so callers can tell "someone else has it" from "the store is
//! broken".

use thiserror::Error;

/// Main Bulkward error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum BulkwardError {
    /// Publication lifecycle errors (client errors)
    #[error("Publication error: {0}")]
    Publication(#[from] PublicationError),

    /// Claim protocol errors
    #[error("Claim error: {0}")]
    Claim(#[from] ClaimError),

    /// File build errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// The next-file query against the store failed. Kept distinct from
    /// "nothing to do" so a broken store is never mistaken for an empty
    /// backlog.
    #[error("Selection failed: {0}")]
    SelectionFailed(String),

    /// Record provider errors
    #[error("Record provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Work-item store errors
    #[error("Work-item store error: {0}")]
    Store(#[from] StoreError),

    /// Output sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Publication lifecycle errors
///
/// Request validation outcomes surfaced to the caller as client errors.
#[derive(Debug, Error)]
pub enum PublicationError {
    /// A publication with this id already exists
    #[error("Publication already exists: {0}")]
    AlreadyExists(String),

    /// No publication with this id
    #[error("Publication not found: {0}")]
    NotFound(String),

    /// The publication exists but has no such file
    #[error("Publication: {publication_id} File: {file_id} not found")]
    FileNotFound {
        publication_id: String,
        file_id: String,
    },

    /// records-per-file exceeds what the record provider can page
    #[error("Records per file too big. Requested: {requested}, max allowed: {max_allowed}")]
    RecordsPerFileTooBig { requested: u32, max_allowed: u32 },
}

/// Claim protocol errors
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Another worker holds the claim. This is the expected contention
    /// outcome, not a system fault.
    #[error("Already claimed. Publication: {publication_id} File: {file_id}")]
    AlreadyClaimed {
        publication_id: String,
        file_id: String,
    },

    /// The claim attempt failed for a reason other than contention
    #[error("Claim failed. Publication: {publication_id} File: {file_id}: {message}")]
    ClaimFailed {
        publication_id: String,
        file_id: String,
        message: String,
    },
}

/// File build errors
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build pipeline failed after a successful claim
    #[error("Build failed. Publication: {publication_id} File: {file_id}: {message}")]
    BuildFailed {
        publication_id: String,
        file_id: String,
        message: String,
    },

    /// The worker pool backlog is full; the submission was rejected
    #[error("Build pool saturated. Publication: {publication_id} File: {file_id}")]
    PoolSaturated {
        publication_id: String,
        file_id: String,
    },
}

/// Record provider errors
///
/// Each failure mode of the external paged record provider is
/// distinguishable. These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request was not allowed (401/403)
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The request was malformed (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The resource requested was not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// An unspecified error occurred while performing the request
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Work-item store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Conditional update lost: the item's version no longer matches
    #[error("Version conflict on {key}")]
    VersionConflict { key: String },

    /// The item addressed by a conditional update does not exist
    #[error("Work item not found: {key}")]
    NotFound { key: String },

    /// A query operation failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A write operation failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Output sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink could not write the file
    #[error("Failed to write {key}: {message}")]
    WriteFailed { key: String, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for BulkwardError {
    fn from(err: std::io::Error) -> Self {
        BulkwardError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BulkwardError {
    fn from(err: serde_json::Error) -> Self {
        BulkwardError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BulkwardError {
    fn from(err: toml::de::Error) -> Self {
        BulkwardError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Identifier validation failures carry a plain message
impl From<String> for BulkwardError {
    fn from(message: String) -> Self {
        BulkwardError::Validation(message)
    }
}

impl BulkwardError {
    /// True when this error is the expected claim-contention outcome rather
    /// than a system fault.
    pub fn is_already_claimed(&self) -> bool {
        matches!(self, BulkwardError::Claim(ClaimError::AlreadyClaimed { .. }))
    }
}
