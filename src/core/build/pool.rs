//! Bounded build worker pool
//!
//! A fixed set of workers pulls jobs from a bounded queue. Submission never
//! blocks: when the backlog is full the job is rejected so the caller can
//! release its claim instead of queueing unboundedly.

use crate::core::build::worker::FileBuildWorker;
use crate::domain::build::{FileBuildResponse, FileClaim};
use crate::domain::errors::BuildError;
use crate::domain::Result;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, Mutex};

struct BuildJob {
    claim: FileClaim,
    done: oneshot::Sender<Result<FileBuildResponse>>,
}

/// The pending result of a submitted build.
#[derive(Debug)]
pub struct BuildHandle {
    rx: oneshot::Receiver<Result<FileBuildResponse>>,
    response: FileBuildResponse,
}

impl BuildHandle {
    /// The dispatch acknowledgement for this build.
    pub fn response(&self) -> &FileBuildResponse {
        &self.response
    }

    /// Wait for the build to finish.
    pub async fn wait(self) -> Result<FileBuildResponse> {
        match self.rx.await {
            Ok(result) => result,
            // The worker dropped the sender without reporting; the pool is
            // shutting down.
            Err(_) => Err(BuildError::BuildFailed {
                publication_id: self.response.publication_id.as_str().to_string(),
                file_id: self.response.file_id.as_str().to_string(),
                message: "build worker stopped before reporting".to_string(),
            }
            .into()),
        }
    }
}

/// Bounded pool of file build workers.
pub struct BuildPool {
    tx: mpsc::Sender<BuildJob>,
}

impl BuildPool {
    /// Start `worker_count` workers sharing a backlog of
    /// `backlog_capacity` queued jobs.
    pub fn start(
        worker_count: usize,
        backlog_capacity: usize,
        worker: Arc<FileBuildWorker>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<BuildJob>(backlog_capacity);
        let rx = Arc::new(Mutex::new(rx));

        for worker_index in 0..worker_count {
            let rx = rx.clone();
            let worker = worker.clone();
            tokio::spawn(async move {
                tracing::debug!(worker_index = worker_index, "Build worker started");
                loop {
                    let job = { rx.lock().await.recv().await };
                    let Some(job) = job else {
                        tracing::debug!(worker_index = worker_index, "Build worker stopped");
                        break;
                    };
                    let result = worker.build(&job.claim).await;
                    // A dropped handle just means nobody is waiting.
                    let _ = job.done.send(result);
                }
            });
        }

        Self { tx }
    }

    /// Submit a claimed file for building.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::PoolSaturated`] when the backlog is full. The
    /// caller still holds the claim and is responsible for releasing it.
    pub fn submit(&self, claim: FileClaim) -> Result<BuildHandle> {
        let response = FileBuildResponse::for_claim(&claim);
        let (done, rx) = oneshot::channel();

        match self.tx.try_send(BuildJob { claim, done }) {
            Ok(()) => Ok(BuildHandle { rx, response }),
            Err(TrySendError::Full(job)) => {
                tracing::warn!(
                    publication_id = %job.claim.request.publication_id,
                    file_id = %job.claim.request.file_id,
                    "Build backlog full, rejecting submission"
                );
                Err(BuildError::PoolSaturated {
                    publication_id: job.claim.request.publication_id.as_str().to_string(),
                    file_id: job.claim.request.file_id.as_str().to_string(),
                }
                .into())
            }
            Err(TrySendError::Closed(job)) => Err(BuildError::BuildFailed {
                publication_id: job.claim.request.publication_id.as_str().to_string(),
                file_id: job.claim.request.file_id.as_str().to_string(),
                message: "build pool is stopped".to_string(),
            }
            .into()),
        }
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
    use crate::core::claim::OptimisticClaimant;
    use crate::domain::build::FileBuildRequest;
    use crate::domain::errors::BulkwardError;
    use crate::domain::ids::{FileId, PublicationId};
    use crate::domain::patient::PatientRecord;
    use crate::domain::work_item::FileWorkItem;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;
    use tempfile::TempDir;

    struct SlowProvider {
        delay: Duration,
    }

    #[async_trait]
    impl RecordProvider for SlowProvider {
        async fn count(&self) -> Result<ResourceCount> {
            Ok(ResourceCount {
                resource_type: "Patient".to_string(),
                count: 1,
                max_records_per_page: 20000,
            })
        }

        async fn fetch_page(&self, _page: u32, _count: u32) -> Result<Vec<PatientRecord>> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![serde_json::from_value(serde_json::json!({
                "id": "1000001V000001"
            }))
            .unwrap()])
        }
    }

    fn work_item(file: &str, page: u32) -> FileWorkItem {
        FileWorkItem {
            publication_id: PublicationId::new("july-2025-full").unwrap(),
            publication_time: Utc::now(),
            records_per_file: 1,
            file_name: FileId::new(file).unwrap(),
            page,
            record_count: 1,
            build_start_time: None,
            build_complete_time: None,
            build_processor_id: None,
            automatic: true,
            version: 0,
        }
    }

    async fn fixture(
        delay: Duration,
        files: &[&str],
    ) -> (Arc<MemoryWorkItemStore>, Arc<FileBuildWorker>, TempDir) {
        let store = Arc::new(MemoryWorkItemStore::new());
        let items = files
            .iter()
            .enumerate()
            .map(|(n, file)| work_item(file, n as u32 + 1))
            .collect();
        store.insert_all(items).await.unwrap();

        let dir = TempDir::new().unwrap();
        let claimant = Arc::new(OptimisticClaimant::new(
            store.clone() as Arc<dyn WorkItemStore>,
            "worker-a",
        ));
        let worker = Arc::new(FileBuildWorker::new(
            Arc::new(SlowProvider { delay }),
            Arc::new(LocalFileSink::new(dir.path())),
            claimant,
            PatientAnonymizer::new(
                SyntheticData::with_reference_year(NameCorpus::shared(), 1000, 90, 2024),
                SaltedType5Generator::new("test-salt", "Patient"),
            ),
        ));
        (store, worker, dir)
    }

    async fn claim_for(store: &Arc<MemoryWorkItemStore>, file: &str) -> FileClaim {
        let claimant = OptimisticClaimant::new(store.clone() as Arc<dyn WorkItemStore>, "worker-a");
        claimant
            .try_claim(&FileBuildRequest::new("july-2025-full", file).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submitted_build_completes() {
        let (store, worker, _dir) = fixture(Duration::from_millis(0), &["Patient-0001"]).await;
        let pool = BuildPool::start(2, 10, worker);

        let claim = claim_for(&store, "Patient-0001").await;
        let handle = pool.submit(claim).unwrap();
        assert_eq!(handle.response().file_id.as_str(), "Patient-0001");

        let response = handle.wait().await.unwrap();
        assert_eq!(response.file_id.as_str(), "Patient-0001");
    }

    #[tokio::test]
    async fn test_full_backlog_rejects_submission() {
        // One worker, backlog of one: the first job occupies the worker,
        // the second fills the queue, the third must be rejected.
        let (store, worker, _dir) = fixture(
            Duration::from_millis(500),
            &["Patient-0001", "Patient-0002", "Patient-0003"],
        )
        .await;
        let pool = BuildPool::start(1, 1, worker);

        let first = pool.submit(claim_for(&store, "Patient-0001").await).unwrap();
        // Give the worker a moment to pull the first job off the queue.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = pool.submit(claim_for(&store, "Patient-0002").await).unwrap();

        let rejected = pool.submit(claim_for(&store, "Patient-0003").await);
        assert!(matches!(
            rejected,
            Err(BulkwardError::Build(BuildError::PoolSaturated { .. }))
        ));

        first.wait().await.unwrap();
        second.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_workers_run_concurrently() {
        let (store, worker, _dir) = fixture(
            Duration::from_millis(200),
            &["Patient-0001", "Patient-0002", "Patient-0003"],
        )
        .await;
        let pool = BuildPool::start(3, 10, worker);

        let start = std::time::Instant::now();
        let handles = vec![
            pool.submit(claim_for(&store, "Patient-0001").await).unwrap(),
            pool.submit(claim_for(&store, "Patient-0002").await).unwrap(),
            pool.submit(claim_for(&store, "Patient-0003").await).unwrap(),
        ];
        for handle in handles {
            handle.wait().await.unwrap();
        }

        // Three 200ms builds on three workers finish well under 600ms.
        assert!(start.elapsed() < Duration::from_millis(550));
    }
}
