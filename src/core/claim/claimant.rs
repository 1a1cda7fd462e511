//! Claimant implementation
//!
//! The claim lifecycle writes through the store's conditional update:
//!
//! 1. `try_claim` stamps the start time and processor id. Losing the
//!    conditional write means another worker claimed first.
//! 2. `complete_claim` stamps the completion time. Completion is
//!    last-writer-wins and retries through version conflicts.
//! 3. `release_claim` returns an unfinished claim to the backlog. Best
//!    effort; a lost race here is left for the recovery sweep.

use crate::adapters::store::WorkItemStore;
use crate::domain::build::{FileBuildRequest, FileClaim};
use crate::domain::errors::{BulkwardError, ClaimError, PublicationError, StoreError};
use crate::domain::work_item::{BuildStatus, FileWorkItem};
use crate::domain::Result;
use chrono::Utc;
use std::sync::Arc;

/// Attempts on a completion write before giving up. Conflicts here are rare;
/// each retry re-reads the current version.
const COMPLETE_RETRY_LIMIT: usize = 5;

/// Derive this instance's processor identity: the `HOSTNAME` environment
/// variable when set, then `HOST`, otherwise a random per-process token.
pub fn default_processor_id() -> String {
    ["HOSTNAME", "HOST"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|name| !name.is_empty()))
        .unwrap_or_else(|| format!("worker-{}", uuid::Uuid::new_v4()))
}

/// Grants exclusive build rights through optimistic concurrency.
pub struct OptimisticClaimant {
    store: Arc<dyn WorkItemStore>,
    processor_id: String,
}

impl OptimisticClaimant {
    pub fn new(store: Arc<dyn WorkItemStore>, processor_id: impl Into<String>) -> Self {
        Self {
            store,
            processor_id: processor_id.into(),
        }
    }

    /// The identity this claimant stamps on claims
    pub fn processor_id(&self) -> &str {
        &self.processor_id
    }

    /// Attempt to claim a file for building.
    ///
    /// A completed file is reclaimable: the claim clears its completion
    /// stamp and the file is rebuilt. Only an in-progress build blocks a
    /// claim.
    ///
    /// # Errors
    ///
    /// - [`PublicationError::FileNotFound`] if the work item does not exist
    /// - [`ClaimError::AlreadyClaimed`] if another worker holds the claim,
    ///   including when this claimant's conditional write loses the race
    /// - [`ClaimError::ClaimFailed`] for store failures
    pub async fn try_claim(&self, request: &FileBuildRequest) -> Result<FileClaim> {
        let item = self.load(request).await?;

        if item.status() == BuildStatus::InProgress {
            return Err(ClaimError::AlreadyClaimed {
                publication_id: request.publication_id.as_str().to_string(),
                file_id: request.file_id.as_str().to_string(),
            }
            .into());
        }

        let version = item.version;
        let mut claimed = item;
        claimed.build_start_time = Some(Utc::now());
        // A rebuild of a completed file starts from a clean slate.
        claimed.build_complete_time = None;
        claimed.build_processor_id = Some(self.processor_id.clone());

        match self.store.update(claimed, version).await {
            Ok(stored) => {
                tracing::info!(
                    publication_id = %request.publication_id,
                    file_id = %request.file_id,
                    processor_id = %self.processor_id,
                    "Claimed file"
                );
                Ok(FileClaim {
                    request: request.clone(),
                    file_name: stored.file_name,
                    page: stored.page,
                    record_count: stored.record_count,
                })
            }
            Err(BulkwardError::Store(StoreError::VersionConflict { .. })) => {
                tracing::debug!(
                    publication_id = %request.publication_id,
                    file_id = %request.file_id,
                    "Lost claim race"
                );
                Err(ClaimError::AlreadyClaimed {
                    publication_id: request.publication_id.as_str().to_string(),
                    file_id: request.file_id.as_str().to_string(),
                }
                .into())
            }
            Err(e) => Err(ClaimError::ClaimFailed {
                publication_id: request.publication_id.as_str().to_string(),
                file_id: request.file_id.as_str().to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Record that a claimed file finished building.
    ///
    /// Completion is last-writer-wins: if a concurrent write (for example a
    /// recovery sweep) moved the version, the completion is re-applied on
    /// top of the fresh item.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::ClaimFailed`] if the write cannot land within
    /// the retry budget.
    pub async fn complete_claim(&self, claim: &FileClaim) -> Result<()> {
        let request = &claim.request;

        for _ in 0..COMPLETE_RETRY_LIMIT {
            let item = self.load(request).await?;
            let version = item.version;

            let mut completed = item;
            // A swept claim has no start time; restore ours so the
            // completed item stays internally consistent.
            if completed.build_start_time.is_none() {
                completed.build_start_time = Some(Utc::now());
            }
            completed.build_processor_id = Some(self.processor_id.clone());
            completed.build_complete_time = Some(Utc::now());

            match self.store.update(completed, version).await {
                Ok(_) => {
                    tracing::info!(
                        publication_id = %request.publication_id,
                        file_id = %request.file_id,
                        "Completed file build"
                    );
                    return Ok(());
                }
                Err(BulkwardError::Store(StoreError::VersionConflict { .. })) => continue,
                Err(e) => {
                    return Err(ClaimError::ClaimFailed {
                        publication_id: request.publication_id.as_str().to_string(),
                        file_id: request.file_id.as_str().to_string(),
                        message: e.to_string(),
                    }
                    .into())
                }
            }
        }

        Err(ClaimError::ClaimFailed {
            publication_id: request.publication_id.as_str().to_string(),
            file_id: request.file_id.as_str().to_string(),
            message: "completion write kept conflicting".to_string(),
        }
        .into())
    }

    /// Return an unfinished claim to the backlog.
    ///
    /// Only clears a claim this processor holds; completed items and other
    /// workers' claims are left alone. Failures are swallowed after logging
    /// since the recovery sweep covers anything left behind.
    pub async fn release_claim(&self, request: &FileBuildRequest) {
        let item = match self.load(request).await {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(
                    publication_id = %request.publication_id,
                    file_id = %request.file_id,
                    error = %e,
                    "Could not load item to release claim"
                );
                return;
            }
        };

        if item.status() != BuildStatus::InProgress
            || item.build_processor_id.as_deref() != Some(self.processor_id.as_str())
        {
            return;
        }

        let version = item.version;
        let mut released = item;
        released.build_start_time = None;
        released.build_processor_id = None;

        if let Err(e) = self.store.update(released, version).await {
            tracing::warn!(
                publication_id = %request.publication_id,
                file_id = %request.file_id,
                error = %e,
                "Failed to release claim; recovery sweep will pick it up"
            );
        } else {
            tracing::info!(
                publication_id = %request.publication_id,
                file_id = %request.file_id,
                "Released claim"
            );
        }
    }

    async fn load(&self, request: &FileBuildRequest) -> Result<FileWorkItem> {
        self.store
            .find_by_publication_and_file(&request.publication_id, &request.file_id)
            .await?
            .ok_or_else(|| {
                PublicationError::FileNotFound {
                    publication_id: request.publication_id.as_str().to_string(),
                    file_id: request.file_id.as_str().to_string(),
                }
                .into()
            })
    }
}
