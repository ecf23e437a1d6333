//! In-memory local repository implementation.
//!
//! Stores restaurants and deals in `HashMap`s behind a single lock. Used for
//! local development, the default server build and tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::db::repository::{
    DatasetRepository, DealRepository, ErrorContext, RepositoryError, RepositoryResult,
    RestaurantRepository,
};
use crate::models::{ActiveDeal, Deal, DealId, Restaurant, RestaurantId, TimeOfDay};

/// In-memory repository.
///
/// Cloning shares the underlying data.
///
/// # Example
/// ```
/// use deals_backend::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.restaurant_count(), 0);
/// assert_eq!(repo.deal_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    restaurants: HashMap<String, Restaurant>,
    deals: HashMap<String, Deal>,
    datasets: HashSet<String>,
    next_restaurant_id: i64,
    next_deal_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            restaurants: HashMap::new(),
            deals: HashMap::new(),
            datasets: HashSet::new(),
            next_restaurant_id: 1,
            next_deal_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn join(&self, deal: &Deal) -> Option<ActiveDeal> {
        self.restaurants
            .get(&deal.restaurant_object_id)
            .map(|restaurant| ActiveDeal {
                deal: deal.clone(),
                restaurant: restaurant.clone(),
            })
    }

    fn collect_deals<F>(&self, keep: F) -> Vec<ActiveDeal>
    where
        F: Fn(&Deal) -> bool,
    {
        let mut deals: Vec<ActiveDeal> = self
            .deals
            .values()
            .filter(|d| keep(d))
            .filter_map(|d| self.join(d))
            .collect();
        deals.sort_by_key(|d| d.deal.id);
        deals
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Toggle simulated connection health. While unhealthy every operation
    /// fails with a retryable connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Remove all stored data, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    pub fn restaurant_count(&self) -> usize {
        self.data.read().restaurants.len()
    }

    pub fn deal_count(&self) -> usize {
        self.data.read().deals.len()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RestaurantRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_restaurant(&self, restaurant: &Restaurant) -> RepositoryResult<Restaurant> {
        self.check_health("store_restaurant")?;
        let mut data = self.data.write();

        if data.restaurants.contains_key(&restaurant.object_id) {
            return Err(RepositoryError::validation_with_context(
                "Restaurant already exists",
                ErrorContext::new("store_restaurant")
                    .with_entity("restaurant")
                    .with_entity_id(&restaurant.object_id),
            ));
        }

        let mut stored = restaurant.clone();
        stored.id = Some(RestaurantId(data.next_restaurant_id));
        data.next_restaurant_id += 1;
        data.restaurants
            .insert(stored.object_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_restaurant_by_object_id(&self, object_id: &str) -> RepositoryResult<Restaurant> {
        self.check_health("get_restaurant_by_object_id")?;
        self.data
            .read()
            .restaurants
            .get(object_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "Restaurant not found",
                    ErrorContext::new("get_restaurant_by_object_id")
                        .with_entity("restaurant")
                        .with_entity_id(object_id),
                )
            })
    }

    async fn list_restaurants(&self) -> RepositoryResult<Vec<Restaurant>> {
        self.check_health("list_restaurants")?;
        let mut restaurants: Vec<Restaurant> = self
            .data
            .read()
            .restaurants
            .values()
            .filter(|r| !r.is_deleted)
            .cloned()
            .collect();
        restaurants.sort_by(|a, b| a.name.cmp(&b.name).then(a.object_id.cmp(&b.object_id)));
        Ok(restaurants)
    }
}

#[async_trait]
impl DealRepository for LocalRepository {
    async fn store_deal(&self, deal: &Deal) -> RepositoryResult<Deal> {
        self.check_health("store_deal")?;
        let mut data = self.data.write();

        if data.deals.contains_key(&deal.object_id) {
            return Err(RepositoryError::validation_with_context(
                "Deal already exists",
                ErrorContext::new("store_deal")
                    .with_entity("deal")
                    .with_entity_id(&deal.object_id),
            ));
        }
        if !data.restaurants.contains_key(&deal.restaurant_object_id) {
            return Err(RepositoryError::not_found_with_context(
                "Restaurant not found for deal",
                ErrorContext::new("store_deal")
                    .with_entity("restaurant")
                    .with_entity_id(&deal.restaurant_object_id),
            ));
        }

        let mut stored = deal.clone();
        stored.id = Some(DealId(data.next_deal_id));
        data.next_deal_id += 1;
        data.deals.insert(stored.object_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_deal_by_object_id(&self, object_id: &str) -> RepositoryResult<Deal> {
        self.check_health("get_deal_by_object_id")?;
        self.data.read().deals.get(object_id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                "Deal not found",
                ErrorContext::new("get_deal_by_object_id")
                    .with_entity("deal")
                    .with_entity_id(object_id),
            )
        })
    }

    async fn find_active_deals_at(&self, time: TimeOfDay) -> RepositoryResult<Vec<ActiveDeal>> {
        self.check_health("find_active_deals_at")?;
        Ok(self
            .data
            .read()
            .collect_deals(|d| d.is_available() && d.is_active_at(time)))
    }

    async fn find_all_valid_deals(&self) -> RepositoryResult<Vec<ActiveDeal>> {
        self.check_health("find_all_valid_deals")?;
        Ok(self.data.read().collect_deals(Deal::is_valid))
    }
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    async fn has_dataset(&self, checksum: &str) -> RepositoryResult<bool> {
        self.check_health("has_dataset")?;
        Ok(self.data.read().datasets.contains(checksum))
    }

    async fn record_dataset(&self, _name: &str, checksum: &str) -> RepositoryResult<()> {
        self.check_health("record_dataset")?;
        self.data.write().datasets.insert(checksum.to_string());
        Ok(())
    }
}
