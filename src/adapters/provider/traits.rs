//! Record provider traits

use crate::domain::patient::PatientRecord;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Total record population reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCount {
    /// The resource type counted, e.g. `Patient`
    pub resource_type: String,

    /// Total records available
    pub count: u64,

    /// The largest page the provider will serve. Publication slicing must
    /// not request files bigger than this.
    pub max_records_per_page: u32,
}

/// Paged patient record source
///
/// Paging is 1-based and deterministic: the same page and size always
/// return the same records, which is what makes file rebuilds repeatable.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Fetch the total record count and the provider's page size limit.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] describing the failure mode.
    ///
    /// [`ProviderError`]: crate::domain::errors::ProviderError
    async fn count(&self) -> Result<ResourceCount>;

    /// Fetch one page of records.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based page ordinal
    /// * `count` - Records per page
    async fn fetch_page(&self, page: u32, count: u32) -> Result<Vec<PatientRecord>>;
}
