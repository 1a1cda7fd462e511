//! In-memory work-item store
//!
//! Backs single-process deployments and tests. The map lock only guards
//! individual operations; cross-operation safety comes from the same
//! conditional-update contract a database-backed store would enforce, so
//! claim behavior is identical in both.

use crate::adapters::store::traits::WorkItemStore;
use crate::domain::errors::{BulkwardError, StoreError};
use crate::domain::ids::{FileId, PublicationId};
use crate::domain::work_item::{BuildStatus, FileWorkItem};
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

type Key = (String, String);

/// In-memory [`WorkItemStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryWorkItemStore {
    items: RwLock<HashMap<Key, FileWorkItem>>,
}

impl MemoryWorkItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(item: &FileWorkItem) -> Key {
        (
            item.publication_id.as_str().to_string(),
            item.file_name.as_str().to_string(),
        )
    }
}

#[async_trait]
impl WorkItemStore for MemoryWorkItemStore {
    async fn insert_all(&self, items: Vec<FileWorkItem>) -> Result<()> {
        let mut map = self.items.write().await;

        // Check every key before touching the map so a collision leaves the
        // store unchanged.
        for item in &items {
            if map.contains_key(&Self::key_of(item)) {
                return Err(StoreError::WriteFailed(format!(
                    "Work item already exists: {}",
                    item.key()
                ))
                .into());
            }
        }

        let count = items.len();
        for item in items {
            map.insert(Self::key_of(&item), item);
        }

        tracing::debug!(count = count, "Inserted work items");
        Ok(())
    }

    async fn delete_publication(&self, publication_id: &PublicationId) -> Result<u64> {
        let mut map = self.items.write().await;
        let before = map.len();
        map.retain(|(publication, _), _| publication != publication_id.as_str());
        Ok((before - map.len()) as u64)
    }

    async fn count_for_publication(&self, publication_id: &PublicationId) -> Result<u64> {
        let map = self.items.read().await;
        let count = map
            .keys()
            .filter(|(publication, _)| publication == publication_id.as_str())
            .count();
        Ok(count as u64)
    }

    async fn find_by_publication(
        &self,
        publication_id: &PublicationId,
    ) -> Result<Vec<FileWorkItem>> {
        let map = self.items.read().await;
        let mut items: Vec<FileWorkItem> = map
            .values()
            .filter(|item| item.publication_id == *publication_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.file_name.as_str().cmp(b.file_name.as_str()));
        Ok(items)
    }

    async fn find_by_publication_and_file(
        &self,
        publication_id: &PublicationId,
        file_id: &FileId,
    ) -> Result<Option<FileWorkItem>> {
        let map = self.items.read().await;
        let key = (
            publication_id.as_str().to_string(),
            file_id.as_str().to_string(),
        );
        Ok(map.get(&key).cloned())
    }

    async fn find_in_progress(&self) -> Result<Vec<FileWorkItem>> {
        let map = self.items.read().await;
        Ok(map
            .values()
            .filter(|item| item.status() == BuildStatus::InProgress)
            .cloned()
            .collect())
    }

    async fn find_not_started(&self, limit: usize) -> Result<Vec<FileWorkItem>> {
        let map = self.items.read().await;
        let mut items: Vec<FileWorkItem> = map
            .values()
            .filter(|item| item.automatic && item.status() == BuildStatus::NotStarted)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.publication_time
                .cmp(&b.publication_time)
                .then_with(|| a.file_name.as_str().cmp(b.file_name.as_str()))
        });
        items.truncate(limit);
        Ok(items)
    }

    async fn distinct_publication_ids(&self) -> Result<Vec<PublicationId>> {
        let map = self.items.read().await;
        let mut newest: HashMap<&str, (&PublicationId, chrono::DateTime<chrono::Utc>)> =
            HashMap::new();
        for item in map.values() {
            let entry = newest
                .entry(item.publication_id.as_str())
                .or_insert((&item.publication_id, item.publication_time));
            if item.publication_time > entry.1 {
                entry.1 = item.publication_time;
            }
        }
        let mut ids: Vec<(&PublicationId, chrono::DateTime<chrono::Utc>)> =
            newest.into_values().collect();
        ids.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(ids.into_iter().map(|(id, _)| id.clone()).collect())
    }

    async fn update(&self, item: FileWorkItem, expected_version: u64) -> Result<FileWorkItem> {
        let mut map = self.items.write().await;
        let key = Self::key_of(&item);

        let stored = map
            .get(&key)
            .ok_or_else(|| BulkwardError::from(StoreError::NotFound { key: item.key() }))?;

        if stored.version != expected_version {
            tracing::debug!(
                key = %item.key(),
                expected = expected_version,
                actual = stored.version,
                "Conditional update rejected"
            );
            return Err(StoreError::VersionConflict { key: item.key() }.into());
        }

        let mut updated = item;
        updated.version = expected_version + 1;
        map.insert(key, updated.clone());
        Ok(updated)
    }
}
