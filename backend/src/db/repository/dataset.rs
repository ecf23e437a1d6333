//! Bookkeeping for seed datasets already loaded into the store.

use async_trait::async_trait;

use super::error::RepositoryResult;

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Whether a dataset with this content checksum was recorded before.
    async fn has_dataset(&self, checksum: &str) -> RepositoryResult<bool>;

    /// Record that the dataset `name` with `checksum` has been loaded.
    async fn record_dataset(&self, name: &str, checksum: &str) -> RepositoryResult<()>;
}
