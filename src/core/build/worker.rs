//! File build worker
//!
//! One claimed file flows through here: fetch the claim's page from the
//! record provider, anonymize every record, serialize to newline-delimited
//! JSON, write the file through the sink, then mark the claim complete.
//! Completion is stamped only after the sink write, so a completed item
//! always has its file.

use crate::adapters::provider::RecordProvider;
use crate::adapters::sink::FileSink;
use crate::anonymization::identifier::SaltedType5Generator;
use crate::anonymization::patient::PatientAnonymizer;
use crate::core::claim::OptimisticClaimant;
use crate::domain::build::{FileBuildResponse, FileClaim};
use crate::domain::errors::BuildError;
use crate::domain::Result;
use std::sync::Arc;

/// Runs the fetch-anonymize-write pipeline for claimed files.
pub struct FileBuildWorker {
    provider: Arc<dyn RecordProvider>,
    sink: Arc<dyn FileSink>,
    claimant: Arc<OptimisticClaimant>,
    anonymizer: PatientAnonymizer<SaltedType5Generator>,
}

impl FileBuildWorker {
    pub fn new(
        provider: Arc<dyn RecordProvider>,
        sink: Arc<dyn FileSink>,
        claimant: Arc<OptimisticClaimant>,
        anonymizer: PatientAnonymizer<SaltedType5Generator>,
    ) -> Self {
        Self {
            provider,
            sink,
            claimant,
            anonymizer,
        }
    }

    /// Build one claimed file.
    ///
    /// On failure the claim is released back to the backlog (best effort)
    /// and a [`BuildError::BuildFailed`] is returned.
    pub async fn build(&self, claim: &FileClaim) -> Result<FileBuildResponse> {
        match self.run_pipeline(claim).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::error!(
                    publication_id = %claim.request.publication_id,
                    file_id = %claim.request.file_id,
                    error = %e,
                    "File build failed"
                );
                self.claimant.release_claim(&claim.request).await;
                Err(BuildError::BuildFailed {
                    publication_id: claim.request.publication_id.as_str().to_string(),
                    file_id: claim.request.file_id.as_str().to_string(),
                    message: e.to_string(),
                }
                .into())
            }
        }
    }

    async fn run_pipeline(&self, claim: &FileClaim) -> Result<FileBuildResponse> {
        let records = self
            .provider
            .fetch_page(claim.page, claim.record_count)
            .await?;

        tracing::debug!(
            publication_id = %claim.request.publication_id,
            file_id = %claim.request.file_id,
            page = claim.page,
            records = records.len(),
            "Fetched page"
        );

        let mut contents = String::new();
        let mut written = 0usize;
        for record in records {
            let anonymized = self.anonymizer.anonymize(record);
            match serde_json::to_string(&anonymized) {
                Ok(line) => {
                    contents.push_str(&line);
                    contents.push('\n');
                    written += 1;
                }
                // A record that won't serialize is dropped, not fatal; the
                // rest of the file is still worth having.
                Err(e) => {
                    tracing::warn!(
                        publication_id = %claim.request.publication_id,
                        file_id = %claim.request.file_id,
                        error = %e,
                        "Dropping unserializable record"
                    );
                }
            }
        }

        let key = format!(
            "{}/{}.ndjson",
            claim.request.publication_id, claim.file_name
        );
        self.sink.write(&key, contents.as_bytes()).await?;

        self.claimant.complete_claim(claim).await?;

        tracing::info!(
            publication_id = %claim.request.publication_id,
            file_id = %claim.request.file_id,
            records = written,
            "Built file"
        );

        Ok(FileBuildResponse::for_claim(claim))
    }
}
