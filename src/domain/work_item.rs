//! File work items and derived build status
//!
//! A [`FileWorkItem`] is one file-sized slice of a publication as tracked in
//! the work-item store. Its [`BuildStatus`] is always derived from the two
//! optional build timestamps, never stored, so there is a single source of
//! truth for "where is this file at".

use crate::domain::ids::{FileId, PublicationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Build state of a single file, derived per item and aggregated per
/// publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    /// No build has been started (or a hung build was reset)
    NotStarted,
    /// A build has started and not yet completed
    InProgress,
    /// The file has been built
    Complete,
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BuildStatus::NotStarted => "NOT_STARTED",
            BuildStatus::InProgress => "IN_PROGRESS",
            BuildStatus::Complete => "COMPLETE",
        };
        write!(f, "{label}")
    }
}

/// One file-sized slice of a publication
///
/// Mutated only through the claimant (start/complete) or the hung-claim
/// recovery sweep (reset start). Never deleted individually; removed only
/// with its parent publication.
///
/// Invariant: `build_complete_time` present implies `build_start_time`
/// present and `build_start_time <= build_complete_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileWorkItem {
    /// The publication this file is part of
    pub publication_id: PublicationId,

    /// When the publication was created
    pub publication_time: DateTime<Utc>,

    /// The maximum number of records that can exist per file
    pub records_per_file: u32,

    /// The file name without extension, e.g. `Patient-0005`
    pub file_name: FileId,

    /// 1-based page ordinal into the provider's record stream
    pub page: u32,

    /// Number of records in this slice
    pub record_count: u32,

    /// Absent if this file has not been started, otherwise when building
    /// started
    pub build_start_time: Option<DateTime<Utc>>,

    /// Absent if this file has not been completed, otherwise when building
    /// completed
    pub build_complete_time: Option<DateTime<Utc>>,

    /// Absent until claimed, otherwise the identity of the instance building
    /// the file
    pub build_processor_id: Option<String>,

    /// Whether this file is eligible for oldest-first automatic scheduling.
    /// Direct builds by id ignore this flag.
    pub automatic: bool,

    /// Monotonic token for conditional updates. Incremented by the store on
    /// every successful write; a stale value makes the next conditional
    /// update fail.
    pub version: u64,
}

impl FileWorkItem {
    /// Derive this item's build status from its timestamps.
    pub fn status(&self) -> BuildStatus {
        if self.build_complete_time.is_some() {
            return BuildStatus::Complete;
        }
        if self.build_start_time.is_some() {
            return BuildStatus::InProgress;
        }
        BuildStatus::NotStarted
    }

    /// The store key for this item.
    pub fn key(&self) -> String {
        format!("{}/{}", self.publication_id, self.file_name)
    }

    /// A representative not-started item, for doc examples and tests.
    pub fn sample() -> Self {
        Self {
            publication_id: PublicationId::new("july-2025-full").expect("valid sample id"),
            publication_time: Utc::now(),
            records_per_file: 100,
            file_name: FileId::new("Patient-0001").expect("valid sample file id"),
            page: 1,
            record_count: 100,
            build_start_time: None,
            build_complete_time: None,
            build_processor_id: None,
            automatic: true,
            version: 0,
        }
    }
}
