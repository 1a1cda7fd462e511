//! Build orchestration
//!
//! Ties the claim protocol, the scheduler, and the worker pool together.
//! Claims are taken synchronously so contention surfaces to the caller as
//! `AlreadyClaimed` before anything is queued; only successfully claimed
//! files enter the pool.

use crate::core::build::pool::{BuildHandle, BuildPool};
use crate::core::claim::OptimisticClaimant;
use crate::core::schedule::OldestFirstScheduler;
use crate::domain::build::FileBuildRequest;
use crate::domain::Result;
use std::sync::Arc;

/// Outcome of draining the pending backlog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrainSummary {
    /// Files built to completion
    pub built: u64,

    /// Files whose build failed (their claims were released)
    pub failed: u64,

    /// Candidates another worker claimed first
    pub skipped: u64,
}

/// Claims files and dispatches them to the build pool.
pub struct FileBuilder {
    claimant: Arc<OptimisticClaimant>,
    scheduler: OldestFirstScheduler,
    pool: BuildPool,
}

impl FileBuilder {
    pub fn new(
        claimant: Arc<OptimisticClaimant>,
        scheduler: OldestFirstScheduler,
        pool: BuildPool,
    ) -> Self {
        Self {
            claimant,
            scheduler,
            pool,
        }
    }

    /// Claim one specific file and dispatch it.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::AlreadyClaimed`] if another worker holds the claim
    /// - [`PublicationError::FileNotFound`] if there is no such work item
    /// - [`BuildError::PoolSaturated`] if the backlog is full; the claim is
    ///   released before returning so the file stays buildable
    ///
    /// [`ClaimError::AlreadyClaimed`]: crate::domain::errors::ClaimError::AlreadyClaimed
    /// [`PublicationError::FileNotFound`]: crate::domain::errors::PublicationError::FileNotFound
    /// [`BuildError::PoolSaturated`]: crate::domain::errors::BuildError::PoolSaturated
    pub async fn build_file(&self, request: &FileBuildRequest) -> Result<BuildHandle> {
        let claim = self.claimant.try_claim(request).await?;

        match self.pool.submit(claim) {
            Ok(handle) => Ok(handle),
            Err(e) => {
                // The claim was taken but never dispatched; hand it back.
                self.claimant.release_claim(request).await;
                Err(e)
            }
        }
    }

    /// Claim and dispatch the next pending file, oldest publication first.
    ///
    /// Candidates already claimed by other workers are skipped. Returns
    /// `Ok(None)` when the backlog is clear.
    pub async fn build_next(&self) -> Result<Option<BuildHandle>> {
        let batch = self.scheduler.next_batch().await?;

        for request in batch {
            match self.build_file(&request).await {
                Ok(handle) => return Ok(Some(handle)),
                Err(e) if e.is_already_claimed() => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    /// Build everything pending, batch by batch, until the backlog is
    /// clear. Each batch's builds are awaited before the next scheduling
    /// pass so the pool never saturates from this path.
    pub async fn drain(&self) -> Result<DrainSummary> {
        let mut summary = DrainSummary::default();

        loop {
            let batch = self.scheduler.next_batch().await?;
            if batch.is_empty() {
                break;
            }

            let mut handles = Vec::with_capacity(batch.len());
            for request in batch {
                match self.build_file(&request).await {
                    Ok(handle) => handles.push(handle),
                    Err(e) if e.is_already_claimed() => summary.skipped += 1,
                    Err(e) => return Err(e),
                }
            }

            let results =
                futures::future::join_all(handles.into_iter().map(|handle| handle.wait())).await;
            for result in results {
                match result {
                    Ok(_) => summary.built += 1,
                    Err(e) => {
                        tracing::warn!(error = %e, "Build failed during drain");
                        summary.failed += 1;
                    }
                }
            }

            // Failed builds return to the backlog; without this check a
            // permanently failing file would loop forever.
            if summary.failed > 0 {
                break;
            }
        }

        tracing::info!(
            built = summary.built,
            failed = summary.failed,
            skipped = summary.skipped,
            "Backlog drained"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::provider::traits::{RecordProvider, ResourceCount};
    use crate::adapters::sink::LocalFileSink;
    use crate::adapters::store::{MemoryWorkItemStore, WorkItemStore};
    use crate::anonymization::identifier::SaltedType5Generator;
    use crate::anonymization::names::NameCorpus;
    use crate::anonymization::patient::PatientAnonymizer;
    use crate::anonymization::synthetic::SyntheticData;
    use crate::core::build::worker::FileBuildWorker;
    use crate::domain::ids::{FileId, PublicationId};
    use crate::domain::patient::PatientRecord;
    use crate::domain::work_item::{BuildStatus, FileWorkItem};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeProvider {
        delay_ms: u64,
    }

    #[async_trait]
    impl RecordProvider for FakeProvider {
        async fn count(&self) -> Result<ResourceCount> {
            Ok(ResourceCount {
                resource_type: "Patient".to_string(),
                count: 4,
                max_records_per_page: 20000,
            })
        }

        async fn fetch_page(&self, page: u32, count: u32) -> Result<Vec<PatientRecord>> {
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            Ok((0..count)
                .map(|n| {
                    serde_json::from_value(serde_json::json!({
                        "id": format!("1{page:03}{n:03}V000001")
                    }))
                    .unwrap()
                })
                .collect())
        }
    }

    fn work_item(publication: &str, file: &str, page: u32, age_minutes: i64) -> FileWorkItem {
        FileWorkItem {
            publication_id: PublicationId::new(publication).unwrap(),
            publication_time: Utc::now() - Duration::minutes(age_minutes),
            records_per_file: 2,
            file_name: FileId::new(file).unwrap(),
            page,
            record_count: 2,
            build_start_time: None,
            build_complete_time: None,
            build_processor_id: None,
            automatic: true,
            version: 0,
        }
    }

    fn builder(store: Arc<MemoryWorkItemStore>, dir: &TempDir) -> FileBuilder {
        builder_with_delay(store, dir, 0)
    }

    fn builder_with_delay(
        store: Arc<MemoryWorkItemStore>,
        dir: &TempDir,
        delay_ms: u64,
    ) -> FileBuilder {
        let claimant = Arc::new(OptimisticClaimant::new(
            store.clone() as Arc<dyn WorkItemStore>,
            "worker-a",
        ));
        let worker = Arc::new(FileBuildWorker::new(
            Arc::new(FakeProvider { delay_ms }),
            Arc::new(LocalFileSink::new(dir.path())),
            claimant.clone(),
            PatientAnonymizer::new(
                SyntheticData::with_reference_year(NameCorpus::shared(), 1000, 90, 2024),
                SaltedType5Generator::new("test-salt", "Patient"),
            ),
        ));
        FileBuilder::new(
            claimant,
            OldestFirstScheduler::new(store, 10),
            BuildPool::start(3, 10, worker),
        )
    }

    #[tokio::test]
    async fn test_build_file_dispatches_and_completes() {
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![work_item("july-2025-full", "Patient-0001", 1, 10)])
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();
        let builder = builder(store.clone(), &dir);

        let request = FileBuildRequest::new("july-2025-full", "Patient-0001").unwrap();
        let handle = builder.build_file(&request).await.unwrap();
        handle.wait().await.unwrap();

        assert!(dir
            .path()
            .join("july-2025-full/Patient-0001.ndjson")
            .exists());
    }

    #[tokio::test]
    async fn test_build_file_twice_is_already_claimed() {
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![work_item("july-2025-full", "Patient-0001", 1, 10)])
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();
        // The delay keeps the first build in flight while the second claim
        // is attempted.
        let builder = builder_with_delay(store, &dir, 300);

        let request = FileBuildRequest::new("july-2025-full", "Patient-0001").unwrap();
        let handle = builder.build_file(&request).await.unwrap();
        let second = builder.build_file(&request).await;
        assert!(second.unwrap_err().is_already_claimed());
        handle.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_build_file_rebuilds_completed_file() {
        // The direct build path ignores current status: a finished file can
        // be claimed again and rebuilt.
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![work_item("july-2025-full", "Patient-0001", 1, 10)])
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();
        let builder = builder(store.clone(), &dir);

        let request = FileBuildRequest::new("july-2025-full", "Patient-0001").unwrap();
        builder.build_file(&request).await.unwrap().wait().await.unwrap();

        let handle = builder.build_file(&request).await.unwrap();
        handle.wait().await.unwrap();

        let item = store
            .find_by_publication_and_file(&request.publication_id, &request.file_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.status(), BuildStatus::Complete);
    }

    #[tokio::test]
    async fn test_build_next_prefers_oldest_publication() {
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![
                work_item("newer-publication", "Patient-0001", 1, 5),
                work_item("older-publication", "Patient-0001", 1, 120),
            ])
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();
        let builder = builder(store, &dir);

        let handle = builder.build_next().await.unwrap().unwrap();
        assert_eq!(
            handle.response().publication_id.as_str(),
            "older-publication"
        );
        handle.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_build_next_empty_backlog() {
        let store = Arc::new(MemoryWorkItemStore::new());
        let dir = TempDir::new().unwrap();
        let builder = builder(store, &dir);
        assert!(builder.build_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_drain_builds_everything() {
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![
                work_item("july-2025-full", "Patient-0001", 1, 10),
                work_item("july-2025-full", "Patient-0002", 2, 10),
                work_item("june-2025-full", "Patient-0001", 1, 60),
            ])
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();
        let builder = builder(store.clone(), &dir);

        let summary = builder.drain().await.unwrap();
        assert_eq!(summary.built, 3);
        assert_eq!(summary.failed, 0);

        let publication = PublicationId::new("july-2025-full").unwrap();
        for item in store.find_by_publication(&publication).await.unwrap() {
            assert_eq!(item.status(), BuildStatus::Complete);
        }
    }
}
