//! Publication status reporting types
//!
//! The aggregated view of a publication produced by
//! [`crate::core::status::aggregate`]: one entry per file plus an overall
//! reduced status.

use crate::domain::ids::{FileId, PublicationId};
use crate::domain::work_item::BuildStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The aggregated status of one publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationStatus {
    pub publication_id: PublicationId,
    pub records_per_file: u32,
    pub creation_time: DateTime<Utc>,
    pub overall_status: BuildStatus,
    pub files: Vec<FileStatus>,
}

/// The derived status of one file within a publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStatus {
    pub file_id: FileId,

    /// 0-based ordinal of the first record in this file:
    /// `(page - 1) * records_per_file`
    pub first_record: u64,

    /// 0-based ordinal of the last record in this file:
    /// `first_record + record_count - 1`
    pub last_record: u64,

    pub status: BuildStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_start_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_complete_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_processor_id: Option<String>,
}
