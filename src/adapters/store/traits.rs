//! Work-item storage traits
//!
//! This module defines the trait that state stores must implement to work
//! with Bulkward.

use crate::domain::ids::{FileId, PublicationId};
use crate::domain::work_item::FileWorkItem;
use crate::domain::Result;
use async_trait::async_trait;

/// Work-item storage trait
///
/// One row per file of a publication. All mutation after the initial insert
/// goes through [`update`](Self::update), which is conditional on the version
/// the caller read. Concurrent writers therefore serialize through version
/// conflicts rather than locks.
#[async_trait]
pub trait WorkItemStore: Send + Sync {
    /// Insert the work items for a newly created publication.
    ///
    /// All items are inserted or none are. Callers are expected to have
    /// checked that the publication does not already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any item's key is already present or the write
    /// fails.
    async fn insert_all(&self, items: Vec<FileWorkItem>) -> Result<()>;

    /// Delete every work item of a publication.
    ///
    /// # Returns
    ///
    /// The number of items removed. Zero means the publication was unknown.
    async fn delete_publication(&self, publication_id: &PublicationId) -> Result<u64>;

    /// Count the work items of a publication.
    async fn count_for_publication(&self, publication_id: &PublicationId) -> Result<u64>;

    /// Fetch every work item of a publication, ordered by file name.
    async fn find_by_publication(&self, publication_id: &PublicationId)
        -> Result<Vec<FileWorkItem>>;

    /// Fetch one work item by publication and file.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(item))` if found, `Ok(None)` if not found.
    async fn find_by_publication_and_file(
        &self,
        publication_id: &PublicationId,
        file_id: &FileId,
    ) -> Result<Option<FileWorkItem>>;

    /// Fetch every work item currently in progress, across publications.
    async fn find_in_progress(&self) -> Result<Vec<FileWorkItem>>;

    /// Fetch up to `limit` not-started, automatically buildable work items,
    /// oldest publication first, then by file name within a publication.
    ///
    /// Items of manual publications are never returned.
    async fn find_not_started(&self, limit: usize) -> Result<Vec<FileWorkItem>>;

    /// Fetch the distinct publication ids known to the store, newest
    /// publication first.
    async fn distinct_publication_ids(&self) -> Result<Vec<PublicationId>>;

    /// Conditionally replace a work item.
    ///
    /// The write succeeds only if the stored version equals
    /// `expected_version`; on success the stored version becomes
    /// `expected_version + 1`.
    ///
    /// # Returns
    ///
    /// The item as stored, with its new version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionConflict`] if another writer got there
    /// first, [`StoreError::NotFound`] if the item does not exist.
    ///
    /// [`StoreError::VersionConflict`]: crate::domain::errors::StoreError::VersionConflict
    /// [`StoreError::NotFound`]: crate::domain::errors::StoreError::NotFound
    async fn update(&self, item: FileWorkItem, expected_version: u64) -> Result<FileWorkItem>;
}
