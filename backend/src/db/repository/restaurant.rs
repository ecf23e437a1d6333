//! Restaurant records and connection health.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::Restaurant;

/// Storage operations for restaurants.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a restaurant and return it with its assigned id.
    ///
    /// # Errors
    /// `ValidationError` if a restaurant with the same `object_id` exists.
    async fn store_restaurant(&self, restaurant: &Restaurant) -> RepositoryResult<Restaurant>;

    /// Look up a restaurant by its upstream identifier.
    ///
    /// # Errors
    /// `NotFound` if no such restaurant exists.
    async fn get_restaurant_by_object_id(&self, object_id: &str) -> RepositoryResult<Restaurant>;

    /// All restaurants that are not soft-deleted, ordered by name.
    async fn list_restaurants(&self) -> RepositoryResult<Vec<Restaurant>>;
}
