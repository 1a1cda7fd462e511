//! Oldest-first scheduler
//!
//! Picks the next files to build: not-started items of automatic
//! publications, oldest publication first so no export starves behind newer
//! ones. Candidates are only suggestions; exclusivity comes from the claim
//! protocol, not from selection.

use crate::adapters::store::WorkItemStore;
use crate::domain::build::FileBuildRequest;
use crate::domain::errors::BulkwardError;
use crate::domain::Result;
use std::sync::Arc;

/// Selects pending files in oldest-publication-first order.
pub struct OldestFirstScheduler {
    store: Arc<dyn WorkItemStore>,
    batch_size: usize,
}

impl OldestFirstScheduler {
    pub fn new(store: Arc<dyn WorkItemStore>, batch_size: usize) -> Self {
        Self { store, batch_size }
    }

    /// The next batch of build candidates. Empty means the backlog is clear.
    ///
    /// # Errors
    ///
    /// Returns [`BulkwardError::SelectionFailed`] if the store query fails,
    /// so a broken store is never mistaken for an empty backlog.
    pub async fn next_batch(&self) -> Result<Vec<FileBuildRequest>> {
        let items = self
            .store
            .find_not_started(self.batch_size)
            .await
            .map_err(|e| BulkwardError::SelectionFailed(e.to_string()))?;

        tracing::debug!(candidates = items.len(), "Scheduling pass");

        Ok(items
            .into_iter()
            .map(|item| FileBuildRequest {
                publication_id: item.publication_id,
                file_id: item.file_name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::traits::WorkItemStore as WorkItemStoreTrait;
    use crate::adapters::store::MemoryWorkItemStore;
    use crate::domain::errors::StoreError;
    use crate::domain::ids::{FileId, PublicationId};
    use crate::domain::work_item::FileWorkItem;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    fn item(publication: &str, file: &str, age_minutes: i64) -> FileWorkItem {
        FileWorkItem {
            publication_id: PublicationId::new(publication).unwrap(),
            publication_time: Utc::now() - Duration::minutes(age_minutes),
            records_per_file: 100,
            file_name: FileId::new(file).unwrap(),
            page: 1,
            record_count: 100,
            build_start_time: None,
            build_complete_time: None,
            build_processor_id: None,
            automatic: true,
            version: 0,
        }
    }

    #[tokio::test]
    async fn test_batch_is_oldest_first() {
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![
                item("new-publication", "Patient-0001", 1),
                item("old-publication", "Patient-0001", 120),
            ])
            .await
            .unwrap();

        let scheduler = OldestFirstScheduler::new(store, 10);
        let batch = scheduler.next_batch().await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].publication_id.as_str(), "old-publication");
        assert_eq!(batch[1].publication_id.as_str(), "new-publication");
    }

    #[tokio::test]
    async fn test_empty_backlog_gives_empty_batch() {
        let store = Arc::new(MemoryWorkItemStore::new());
        let scheduler = OldestFirstScheduler::new(store, 10);
        assert!(scheduler.next_batch().await.unwrap().is_empty());
    }

    struct BrokenStore;

    #[async_trait]
    impl WorkItemStoreTrait for BrokenStore {
        async fn insert_all(&self, _items: Vec<FileWorkItem>) -> Result<()> {
            unimplemented!()
        }
        async fn delete_publication(&self, _publication_id: &PublicationId) -> Result<u64> {
            unimplemented!()
        }
        async fn count_for_publication(&self, _publication_id: &PublicationId) -> Result<u64> {
            unimplemented!()
        }
        async fn find_by_publication(
            &self,
            _publication_id: &PublicationId,
        ) -> Result<Vec<FileWorkItem>> {
            unimplemented!()
        }
        async fn find_by_publication_and_file(
            &self,
            _publication_id: &PublicationId,
            _file_id: &FileId,
        ) -> Result<Option<FileWorkItem>> {
            unimplemented!()
        }
        async fn find_in_progress(&self) -> Result<Vec<FileWorkItem>> {
            unimplemented!()
        }
        async fn find_not_started(&self, _limit: usize) -> Result<Vec<FileWorkItem>> {
            Err(StoreError::QueryFailed("store offline".to_string()).into())
        }
        async fn distinct_publication_ids(&self) -> Result<Vec<PublicationId>> {
            unimplemented!()
        }
        async fn update(&self, _item: FileWorkItem, _expected_version: u64) -> Result<FileWorkItem> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_selection_failed() {
        let scheduler = OldestFirstScheduler::new(Arc::new(BrokenStore), 10);
        let result = scheduler.next_batch().await;
        assert!(matches!(result, Err(BulkwardError::SelectionFailed(_))));
    }
}
