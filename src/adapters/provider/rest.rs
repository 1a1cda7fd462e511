//! REST record provider implementation
//!
//! This module implements [`RecordProvider`] against the upstream data-query
//! service. The access key travels in a configurable header; every HTTP
//! failure mode maps to a distinct [`ProviderError`] so callers never see
//! client-library types.

use crate::adapters::provider::traits::{RecordProvider, ResourceCount};
use crate::config::ProviderConfig;
use crate::domain::errors::{BulkwardError, ProviderError};
use crate::domain::patient::PatientRecord;
use crate::domain::Result;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;

/// REST implementation of [`RecordProvider`]
pub struct RestRecordProvider {
    base_url: String,
    client: Client,
    config: ProviderConfig,
}

impl RestRecordProvider {
    /// Create a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                BulkwardError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Get the base URL of the record provider
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retry a request with exponential backoff. Only transport-level
    /// failures are retried; access and request errors are final.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let retryable =
                        matches!(e, BulkwardError::Provider(ProviderError::RequestFailed(_)));
                    attempt += 1;
                    if !retryable || attempt >= max_retries {
                        return Err(e);
                    }

                    let delay_ms = backoff_delay_ms(&self.config.retry, attempt);

                    tracing::warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    /// Map a non-success response status to a provider error.
    fn status_error(status: StatusCode, url: &str) -> ProviderError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::AccessDenied(url.to_string())
            }
            StatusCode::BAD_REQUEST => ProviderError::BadRequest(url.to_string()),
            StatusCode::NOT_FOUND => ProviderError::NotFound(url.to_string()),
            _ => ProviderError::RequestFailed(format!("{url} returned status {status}")),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .header(
                self.config.access_key_header.as_str(),
                self.config.access_key.expose_secret().as_ref(),
            )
            .send()
            .await
            .map_err(|e| {
                BulkwardError::Provider(ProviderError::RequestFailed(format!("{url}: {e}")))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(status, url).into());
        }

        resp.json::<T>().await.map_err(|e| {
            BulkwardError::Provider(ProviderError::RequestFailed(format!(
                "{url} returned an unreadable body: {e}"
            )))
        })
    }
}

#[async_trait]
impl RecordProvider for RestRecordProvider {
    async fn count(&self) -> Result<ResourceCount> {
        let url = format!("{}/Patient/count", self.base_url);
        tracing::debug!(url = %url, "Fetching record count");

        let count: ResourceCount = self.retry_request(|| self.get_json(&url)).await?;

        tracing::info!(
            count = count.count,
            max_records_per_page = count.max_records_per_page,
            "Record provider count"
        );
        Ok(count)
    }

    async fn fetch_page(&self, page: u32, count: u32) -> Result<Vec<PatientRecord>> {
        let url = format!("{}/Patient?page={page}&_count={count}", self.base_url);
        tracing::debug!(url = %url, page = page, count = count, "Fetching record page");

        let bundle: RecordBundle = self.retry_request(|| self.get_json(&url)).await?;

        Ok(bundle
            .entry
            .into_iter()
            .map(|entry| entry.resource)
            .collect())
    }
}

/// Delay before retry `attempt` (1-based). The whole product stays in
/// floating point until the end so fractional multipliers compound instead
/// of truncating to 1.
fn backoff_delay_ms(retry: &crate::config::RetryConfig, attempt: usize) -> u64 {
    let scaled =
        retry.initial_delay_ms as f64 * retry.backoff_multiplier.powf((attempt - 1) as f64);
    (scaled as u64).min(retry.max_delay_ms)
}

/// Paged bundle response shape
#[derive(Debug, Deserialize)]
struct RecordBundle {
    #[serde(default)]
    entry: Vec<BundleEntry>,
}

#[derive(Debug, Deserialize)]
struct BundleEntry {
    resource: PatientRecord,
}
