//! Hung-claim sweeper
//!
//! A worker that crashes mid-build leaves its file stuck in progress
//! forever. The sweep finds in-progress items whose build has run strictly
//! longer than the allowed hang time and clears their start time and
//! processor id, returning them to the backlog. Resets go through the same
//! conditional update as claims, so a sweep racing a finishing worker loses
//! cleanly.

use crate::adapters::store::WorkItemStore;
use crate::domain::errors::{BulkwardError, StoreError};
use crate::domain::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Shorter hang times would sweep healthy builds out from under their
/// workers.
const MIN_HANG_MINUTES: i64 = 1;

/// Periodically returns hung claims to the backlog.
pub struct HungClaimSweeper {
    store: Arc<dyn WorkItemStore>,
    allowed_hang: Duration,
}

impl HungClaimSweeper {
    /// Create a sweeper with the given hang allowance.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the allowance is under one minute.
    pub fn new(store: Arc<dyn WorkItemStore>, allowed_hang: Duration) -> Result<Self> {
        if allowed_hang < Duration::minutes(MIN_HANG_MINUTES) {
            return Err(BulkwardError::Validation(format!(
                "Allowed hang time must be at least {MIN_HANG_MINUTES} minute, got {allowed_hang}"
            )));
        }
        Ok(Self {
            store,
            allowed_hang,
        })
    }

    /// Sweep once against the given clock, returning how many claims were
    /// reset.
    ///
    /// A claim is hung only when its elapsed build time strictly exceeds
    /// the allowance; a build at exactly the limit is left alone.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<u64> {
        let in_progress = self.store.find_in_progress().await?;
        let mut cleared = 0u64;

        for item in in_progress {
            let Some(started) = item.build_start_time else {
                continue;
            };
            if now - started <= self.allowed_hang {
                continue;
            }

            let key = item.key();
            let processor = item.build_processor_id.clone();
            let version = item.version;
            let mut reset = item;
            reset.build_start_time = None;
            reset.build_processor_id = None;

            match self.store.update(reset, version).await {
                Ok(_) => {
                    tracing::warn!(
                        key = %key,
                        processor_id = processor.as_deref().unwrap_or("unknown"),
                        started = %started,
                        "Cleared hung claim"
                    );
                    cleared += 1;
                }
                // The item moved under us, most likely the worker finished
                // after all. Leave it for the next sweep to re-evaluate.
                Err(BulkwardError::Store(StoreError::VersionConflict { .. })) => {
                    tracing::debug!(key = %key, "Hung claim moved during sweep, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        if cleared > 0 {
            tracing::info!(cleared = cleared, "Hung-claim sweep finished");
        }
        Ok(cleared)
    }

    /// Run sweeps forever at the given interval. Intended to be spawned as
    /// a background task; sweep failures are logged and the loop continues.
    pub async fn run(self, interval: std::time::Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep(Utc::now()).await {
                tracing::error!(error = %e, "Hung-claim sweep failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::MemoryWorkItemStore;
    use crate::domain::ids::{FileId, PublicationId};
    use crate::domain::work_item::{BuildStatus, FileWorkItem};

    fn in_progress_item(file: &str, started_hours_ago: i64) -> FileWorkItem {
        let now = Utc::now();
        FileWorkItem {
            publication_id: PublicationId::new("july-2025-full").unwrap(),
            publication_time: now - Duration::days(1),
            records_per_file: 100,
            file_name: FileId::new(file).unwrap(),
            page: 1,
            record_count: 100,
            build_start_time: Some(now - Duration::hours(started_hours_ago)),
            build_complete_time: None,
            build_processor_id: Some("worker-a".to_string()),
            automatic: true,
            version: 0,
        }
    }

    #[tokio::test]
    async fn test_rejects_sub_minute_allowance() {
        let store = Arc::new(MemoryWorkItemStore::new());
        assert!(HungClaimSweeper::new(store.clone(), Duration::seconds(59)).is_err());
        assert!(HungClaimSweeper::new(store, Duration::minutes(1)).is_ok());
    }

    #[tokio::test]
    async fn test_sweep_clears_only_overdue_claims() {
        // Allowance of 4 hours: a 5-hour build is hung, a 3-hour build is
        // not.
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![
                in_progress_item("Patient-0001", 5),
                in_progress_item("Patient-0002", 3),
            ])
            .await
            .unwrap();

        let sweeper = HungClaimSweeper::new(store.clone(), Duration::hours(4)).unwrap();
        let cleared = sweeper.sweep(Utc::now()).await.unwrap();
        assert_eq!(cleared, 1);

        let publication = PublicationId::new("july-2025-full").unwrap();
        let items = store.find_by_publication(&publication).await.unwrap();
        assert_eq!(items[0].status(), BuildStatus::NotStarted);
        assert!(items[0].build_processor_id.is_none());
        assert_eq!(items[1].status(), BuildStatus::InProgress);
    }

    #[tokio::test]
    async fn test_exactly_at_limit_is_not_hung() {
        let store = Arc::new(MemoryWorkItemStore::new());
        let now = Utc::now();
        let mut item = in_progress_item("Patient-0001", 0);
        item.build_start_time = Some(now - Duration::hours(4));
        store.insert_all(vec![item]).await.unwrap();

        let sweeper = HungClaimSweeper::new(store, Duration::hours(4)).unwrap();
        let cleared = sweeper.sweep(now).await.unwrap();
        assert_eq!(cleared, 0);
    }

    #[tokio::test]
    async fn test_completed_items_are_not_swept() {
        let store = Arc::new(MemoryWorkItemStore::new());
        let mut item = in_progress_item("Patient-0001", 10);
        item.build_complete_time = Some(Utc::now());
        store.insert_all(vec![item]).await.unwrap();

        let sweeper = HungClaimSweeper::new(store.clone(), Duration::hours(4)).unwrap();
        let cleared = sweeper.sweep(Utc::now()).await.unwrap();
        assert_eq!(cleared, 0);
    }

    #[tokio::test]
    async fn test_swept_item_is_schedulable_again() {
        let store = Arc::new(MemoryWorkItemStore::new());
        store
            .insert_all(vec![in_progress_item("Patient-0001", 5)])
            .await
            .unwrap();

        let sweeper = HungClaimSweeper::new(store.clone(), Duration::hours(4)).unwrap();
        sweeper.sweep(Utc::now()).await.unwrap();

        let pending = store.find_not_started(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].file_name.as_str(), "Patient-0001");
    }
}
