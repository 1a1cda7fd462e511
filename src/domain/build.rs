//! Build protocol types
//!
//! The request/claim/response triple that flows through the claim protocol
//! and the worker pool, plus the publication creation request.

use crate::domain::ids::{FileId, PublicationId};
use serde::{Deserialize, Serialize};

/// A request to build one specific file of a publication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileBuildRequest {
    pub publication_id: PublicationId,
    pub file_id: FileId,
}

impl FileBuildRequest {
    /// Creates a request, validating both identifiers.
    pub fn new(
        publication_id: impl Into<String>,
        file_id: impl Into<String>,
    ) -> Result<Self, String> {
        Ok(Self {
            publication_id: PublicationId::new(publication_id)?,
            file_id: FileId::new(file_id)?,
        })
    }
}

/// Exclusive rights to build one file, granted via optimistic concurrency.
///
/// A claim is a capability token handed to the build pipeline. It is not
/// persisted as its own entity; the underlying work item carries the durable
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileClaim {
    /// The original request
    pub request: FileBuildRequest,

    /// The file name without extension, e.g. `Patient-0005`
    pub file_name: FileId,

    /// 1-based page ordinal to fetch from the record provider
    pub page: u32,

    /// Number of records in this file
    pub record_count: u32,
}

/// Acknowledgement that a build was accepted and dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileBuildResponse {
    pub publication_id: PublicationId,
    pub file_id: FileId,
}

impl FileBuildResponse {
    pub fn for_claim(claim: &FileClaim) -> Self {
        Self {
            publication_id: claim.request.publication_id.clone(),
            file_id: claim.request.file_id.clone(),
        }
    }
}

/// A request to create a publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRequest {
    pub publication_id: PublicationId,

    /// Records per file, 1..=500000. Additionally bounded by the record
    /// provider's maximum page size at creation time.
    pub records_per_file: u32,

    /// Whether the created files are eligible for automatic scheduling
    #[serde(default = "default_automatic")]
    pub automatic: bool,
}

fn default_automatic() -> bool {
    true
}

/// Upper bound on records per file, independent of the provider's page limit.
pub const MAX_RECORDS_PER_FILE: u32 = 500_000;
