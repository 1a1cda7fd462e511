//! Publication lifecycle management
//!
//! Creation slices the provider's record population into file-sized work
//! items up front; file boundaries are fixed for the publication's lifetime
//! so every build of a file covers the same records. Files are named
//! `Patient-NNNN` by 1-based page ordinal.

use crate::adapters::provider::RecordProvider;
use crate::adapters::store::WorkItemStore;
use crate::core::status;
use crate::domain::build::{PublicationRequest, MAX_RECORDS_PER_FILE};
use crate::domain::errors::{BulkwardError, PublicationError};
use crate::domain::ids::{FileId, PublicationId};
use crate::domain::status::PublicationStatus;
use crate::domain::work_item::FileWorkItem;
use crate::domain::Result;
use chrono::Utc;
use std::sync::Arc;

/// Creates, deletes, and reports on publications.
pub struct PublicationManager {
    store: Arc<dyn WorkItemStore>,
    provider: Arc<dyn RecordProvider>,
}

impl PublicationManager {
    pub fn new(store: Arc<dyn WorkItemStore>, provider: Arc<dyn RecordProvider>) -> Self {
        Self { store, provider }
    }

    /// Create a publication, slicing the current record population into
    /// not-started work items.
    ///
    /// # Returns
    ///
    /// The file ids created, in page order.
    ///
    /// # Errors
    ///
    /// - [`PublicationError::AlreadyExists`] if the id is taken
    /// - [`PublicationError::RecordsPerFileTooBig`] if the requested file
    ///   size exceeds the static cap or the provider's page limit
    pub async fn create(&self, request: &PublicationRequest) -> Result<Vec<FileId>> {
        if request.records_per_file == 0 || request.records_per_file > MAX_RECORDS_PER_FILE {
            return Err(PublicationError::RecordsPerFileTooBig {
                requested: request.records_per_file,
                max_allowed: MAX_RECORDS_PER_FILE,
            }
            .into());
        }

        let existing = self
            .store
            .count_for_publication(&request.publication_id)
            .await?;
        if existing > 0 {
            return Err(
                PublicationError::AlreadyExists(request.publication_id.as_str().to_string())
                    .into(),
            );
        }

        let population = self.provider.count().await?;
        if request.records_per_file > population.max_records_per_page {
            return Err(PublicationError::RecordsPerFileTooBig {
                requested: request.records_per_file,
                max_allowed: population.max_records_per_page,
            }
            .into());
        }

        let items = slice_into_work_items(request, population.count);
        let file_ids: Vec<FileId> = items.iter().map(|item| item.file_name.clone()).collect();

        if items.is_empty() {
            tracing::warn!(
                publication_id = %request.publication_id,
                "Provider reports zero records; publication has no files"
            );
            return Ok(file_ids);
        }

        self.store.insert_all(items).await?;

        tracing::info!(
            publication_id = %request.publication_id,
            records_per_file = request.records_per_file,
            total_records = population.count,
            files = file_ids.len(),
            "Created publication"
        );
        Ok(file_ids)
    }

    /// Delete a publication and all of its work items.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::NotFound`] if the publication is unknown.
    pub async fn delete(&self, publication_id: &PublicationId) -> Result<()> {
        let deleted = self.store.delete_publication(publication_id).await?;
        if deleted == 0 {
            return Err(
                PublicationError::NotFound(publication_id.as_str().to_string()).into(),
            );
        }
        tracing::info!(
            publication_id = %publication_id,
            files = deleted,
            "Deleted publication"
        );
        Ok(())
    }

    /// List known publications, newest first.
    pub async fn list(&self) -> Result<Vec<PublicationId>> {
        self.store.distinct_publication_ids().await
    }

    /// The aggregated status of one publication.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::NotFound`] if the publication is unknown.
    pub async fn status(&self, publication_id: &PublicationId) -> Result<PublicationStatus> {
        let items = self.store.find_by_publication(publication_id).await?;
        status::aggregate(publication_id, &items)
    }
}

/// Slice a record population into file-sized work items. The last file
/// holds the remainder; every other file is full.
fn slice_into_work_items(request: &PublicationRequest, total_records: u64) -> Vec<FileWorkItem> {
    let records_per_file = request.records_per_file as u64;
    let file_count = total_records.div_ceil(records_per_file);
    let publication_time = Utc::now();

    (1..=file_count)
        .map(|page| {
            let remaining = total_records - (page - 1) * records_per_file;
            let record_count = remaining.min(records_per_file) as u32;
            FileWorkItem {
                publication_id: request.publication_id.clone(),
                publication_time,
                records_per_file: request.records_per_file,
                // Guaranteed valid: fixed prefix plus zero-padded ordinal.
                file_name: FileId::new(format!("Patient-{page:04}"))
                    .unwrap_or_else(|_| unreachable!("generated file name is always valid")),
                page: page as u32,
                record_count,
                build_start_time: None,
                build_complete_time: None,
                build_processor_id: None,
                automatic: request.automatic,
                version: 0,
            }
        })
        .collect()
}
