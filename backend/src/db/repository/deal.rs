//! Deal records and time-of-day queries.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{ActiveDeal, Deal, TimeOfDay};

/// Storage operations for deals.
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Insert a deal and return it with its assigned id.
    ///
    /// # Errors
    /// * `ValidationError` if a deal with the same `object_id` exists
    /// * `NotFound` if `restaurant_object_id` does not name a stored restaurant
    async fn store_deal(&self, deal: &Deal) -> RepositoryResult<Deal>;

    /// Look up a deal by its upstream identifier.
    async fn get_deal_by_object_id(&self, object_id: &str) -> RepositoryResult<Deal>;

    /// Deals that are available (not deleted, `qty_left > 0`) and whose window
    /// contains `time` according to [`Deal::is_active_at`].
    async fn find_active_deals_at(&self, time: TimeOfDay) -> RepositoryResult<Vec<ActiveDeal>>;

    /// Every deal that is not soft-deleted, regardless of quantity or time.
    async fn find_all_valid_deals(&self) -> RepositoryResult<Vec<ActiveDeal>>;
}
