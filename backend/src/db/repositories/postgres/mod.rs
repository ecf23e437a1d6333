//! Postgres repository implementation using Diesel.
//!
//! Three tables back the service: `restaurants`, `deals` (joined to
//! restaurants through `restaurant_object_id`) and `datasets`, which records
//! the checksum of every seed file already loaded.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    DatasetRepository, DealRepository, ErrorContext, RepositoryError, RepositoryResult,
    RestaurantRepository,
};
use crate::models::{ActiveDeal, Deal, DealId, Restaurant, RestaurantId, TimeOfDay};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
///
/// Runs pending migrations on construction and retries transient failures
/// with exponential backoff.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// Blocks while the pool is built; call it from `spawn_blocking` when
    /// already inside a runtime.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Execute a database operation on a pooled connection, retrying up to
    /// `max_retries` times while the error is retryable.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    log::debug!("Retrying database operation (attempt {})", attempt + 1);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Load non-deleted deals joined with their restaurant, optionally only
    /// those with stock left.
    async fn load_joined_deals(
        &self,
        operation: &'static str,
        available_only: bool,
    ) -> RepositoryResult<Vec<ActiveDeal>> {
        self.with_conn(move |conn| {
            let mut query = deals::table
                .inner_join(restaurants::table.on(restaurants::object_id.eq(deals::restaurant_object_id)))
                .filter(deals::is_deleted.eq(false))
                .select((DealRow::as_select(), RestaurantRow::as_select()))
                .order(deals::deal_id.asc())
                .into_boxed();
            if available_only {
                query = query.filter(deals::qty_left.gt(0));
            }

            let rows: Vec<(DealRow, RestaurantRow)> = query
                .load(conn)
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

            rows.into_iter()
                .map(|(deal, restaurant)| {
                    Ok(ActiveDeal {
                        deal: deal_from_row(deal),
                        restaurant: restaurant_from_row(restaurant)?,
                    })
                })
                .collect()
        })
        .await
    }
}

fn restaurant_from_row(row: RestaurantRow) -> RepositoryResult<Restaurant> {
    let cuisines: Vec<String> = serde_json::from_value(row.cuisines_json).map_err(|e| {
        RepositoryError::internal_with_context(
            format!("Failed to parse cuisines JSON: {e}"),
            ErrorContext::new("restaurant_from_row")
                .with_entity("restaurant")
                .with_entity_id(&row.object_id),
        )
    })?;

    Ok(Restaurant {
        id: Some(RestaurantId(row.restaurant_id)),
        object_id: row.object_id,
        name: row.name,
        address1: row.address1,
        suburb: row.suburb,
        cuisines,
        image_link: row.image_link,
        open: row.open_time.into(),
        close: row.close_time.into(),
        is_deleted: row.is_deleted,
    })
}

fn deal_from_row(row: DealRow) -> Deal {
    Deal {
        id: Some(DealId(row.deal_id)),
        object_id: row.object_id,
        restaurant_object_id: row.restaurant_object_id,
        restaurant_name: row.restaurant_name,
        description: row.description,
        discount: row.discount,
        dine_in: row.dine_in,
        lightning: row.lightning,
        qty_left: row.qty_left,
        start: row.start_time.into(),
        end: row.end_time.into(),
        is_deleted: row.is_deleted,
    }
}

#[async_trait]
impl RestaurantRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn store_restaurant(&self, restaurant: &Restaurant) -> RepositoryResult<Restaurant> {
        let new_row = NewRestaurantRow {
            object_id: restaurant.object_id.clone(),
            name: restaurant.name.clone(),
            address1: restaurant.address1.clone(),
            suburb: restaurant.suburb.clone(),
            cuisines_json: serde_json::Value::from(restaurant.cuisines.clone()),
            image_link: restaurant.image_link.clone(),
            open_time: restaurant.open.to_naive_time(),
            close_time: restaurant.close.to_naive_time(),
            is_deleted: restaurant.is_deleted,
        };

        self.with_conn(move |conn| {
            let row: RestaurantRow = diesel::insert_into(restaurants::table)
                .values(&new_row)
                .returning(RestaurantRow::as_returning())
                .get_result(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("store_restaurant"))?;
            restaurant_from_row(row)
        })
        .await
    }

    async fn get_restaurant_by_object_id(&self, object_id: &str) -> RepositoryResult<Restaurant> {
        let object_id = object_id.to_string();
        self.with_conn(move |conn| {
            let row = restaurants::table
                .filter(restaurants::object_id.eq(&object_id))
                .select(RestaurantRow::as_select())
                .first::<RestaurantRow>(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("get_restaurant_by_object_id"))?;
            restaurant_from_row(row)
        })
        .await
    }

    async fn list_restaurants(&self) -> RepositoryResult<Vec<Restaurant>> {
        self.with_conn(|conn| {
            let rows = restaurants::table
                .filter(restaurants::is_deleted.eq(false))
                .select(RestaurantRow::as_select())
                .order((restaurants::name.asc(), restaurants::object_id.asc()))
                .load::<RestaurantRow>(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("list_restaurants"))?;
            rows.into_iter().map(restaurant_from_row).collect()
        })
        .await
    }
}

#[async_trait]
impl DealRepository for PostgresRepository {
    async fn store_deal(&self, deal: &Deal) -> RepositoryResult<Deal> {
        let new_row = NewDealRow {
            object_id: deal.object_id.clone(),
            restaurant_object_id: deal.restaurant_object_id.clone(),
            restaurant_name: deal.restaurant_name.clone(),
            description: deal.description.clone(),
            discount: deal.discount,
            dine_in: deal.dine_in,
            lightning: deal.lightning,
            qty_left: deal.qty_left,
            start_time: deal.start.to_naive_time(),
            end_time: deal.end.to_naive_time(),
            is_deleted: deal.is_deleted,
        };

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let restaurant_exists: bool = diesel::select(diesel::dsl::exists(
                    restaurants::table
                        .filter(restaurants::object_id.eq(&new_row.restaurant_object_id)),
                ))
                .get_result(tx)
                .map_err(RepositoryError::from)?;

                if !restaurant_exists {
                    return Err(RepositoryError::not_found_with_context(
                        "Restaurant not found for deal",
                        ErrorContext::new("store_deal")
                            .with_entity("restaurant")
                            .with_entity_id(&new_row.restaurant_object_id),
                    ));
                }

                let row: DealRow = diesel::insert_into(deals::table)
                    .values(&new_row)
                    .returning(DealRow::as_returning())
                    .get_result(tx)
                    .map_err(|e| RepositoryError::from(e).with_operation("store_deal"))?;
                Ok(deal_from_row(row))
            })
        })
        .await
    }

    async fn get_deal_by_object_id(&self, object_id: &str) -> RepositoryResult<Deal> {
        let object_id = object_id.to_string();
        self.with_conn(move |conn| {
            deals::table
                .filter(deals::object_id.eq(&object_id))
                .select(DealRow::as_select())
                .first::<DealRow>(conn)
                .map(deal_from_row)
                .map_err(|e| RepositoryError::from(e).with_operation("get_deal_by_object_id"))
        })
        .await
    }

    async fn find_active_deals_at(&self, time: TimeOfDay) -> RepositoryResult<Vec<ActiveDeal>> {
        // Windows may wrap past midnight, so the time check runs here rather
        // than in SQL.
        let candidates = self.load_joined_deals("find_active_deals_at", true).await?;
        Ok(candidates
            .into_iter()
            .filter(|d| d.deal.is_active_at(time))
            .collect())
    }

    async fn find_all_valid_deals(&self) -> RepositoryResult<Vec<ActiveDeal>> {
        self.load_joined_deals("find_all_valid_deals", false).await
    }
}

#[async_trait]
impl DatasetRepository for PostgresRepository {
    async fn has_dataset(&self, checksum: &str) -> RepositoryResult<bool> {
        let checksum = checksum.to_string();
        self.with_conn(move |conn| {
            diesel::select(diesel::dsl::exists(
                datasets::table.filter(datasets::checksum.eq(&checksum)),
            ))
            .get_result(conn)
            .map_err(|e| RepositoryError::from(e).with_operation("has_dataset"))
        })
        .await
    }

    async fn record_dataset(&self, name: &str, checksum: &str) -> RepositoryResult<()> {
        let new_row = NewDatasetRow {
            dataset_name: name.to_string(),
            checksum: checksum.to_string(),
        };
        self.with_conn(move |conn| {
            diesel::insert_into(datasets::table)
                .values(&new_row)
                .on_conflict(datasets::checksum)
                .do_nothing()
                .execute(conn)
                .map(|_| ())
                .map_err(|e| RepositoryError::from(e).with_operation("record_dataset"))
        })
        .await
    }
}
