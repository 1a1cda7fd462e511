//! Publication status aggregation
//!
//! Reduces a publication's work items to one overall status:
//!
//! - every file complete: the publication is `COMPLETE`
//! - any file started or complete: the publication is `IN_PROGRESS`
//! - otherwise `NOT_STARTED`
//!
//! Pure functions of the items passed in; nothing here reads the store.

use crate::domain::errors::PublicationError;
use crate::domain::ids::PublicationId;
use crate::domain::status::{FileStatus, PublicationStatus};
use crate::domain::work_item::{BuildStatus, FileWorkItem};
use crate::domain::Result;

/// Aggregate a publication's work items into a [`PublicationStatus`].
///
/// # Errors
///
/// Returns [`PublicationError::NotFound`] when `items` is empty, since an
/// existing publication always has at least one file.
pub fn aggregate(publication_id: &PublicationId, items: &[FileWorkItem]) -> Result<PublicationStatus> {
    if items.is_empty() {
        return Err(PublicationError::NotFound(publication_id.as_str().to_string()).into());
    }

    let mut complete = 0usize;
    let mut in_progress = 0usize;
    let mut files = Vec::with_capacity(items.len());

    for item in items {
        match item.status() {
            BuildStatus::Complete => complete += 1,
            BuildStatus::InProgress => in_progress += 1,
            BuildStatus::NotStarted => {}
        }
        files.push(file_status(item));
    }

    let overall_status = if complete == items.len() {
        BuildStatus::Complete
    } else if complete > 0 || in_progress > 0 {
        BuildStatus::InProgress
    } else {
        BuildStatus::NotStarted
    };

    // Creation time is shared across a publication's items; take the
    // earliest in case of drift.
    let creation_time = items
        .iter()
        .map(|item| item.publication_time)
        .min()
        .unwrap_or_default();

    Ok(PublicationStatus {
        publication_id: publication_id.clone(),
        records_per_file: items[0].records_per_file,
        creation_time,
        overall_status,
        files,
    })
}

/// Derive one file's reported status, including its record range.
fn file_status(item: &FileWorkItem) -> FileStatus {
    let first_record = (item.page as u64 - 1) * item.records_per_file as u64;
    FileStatus {
        file_id: item.file_name.clone(),
        first_record,
        last_record: first_record + item.record_count as u64 - 1,
        status: item.status(),
        build_start_time: item.build_start_time,
        build_complete_time: item.build_complete_time,
        build_processor_id: item.build_processor_id.clone(),
    }
}
