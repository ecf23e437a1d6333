//! Storage layer for restaurants and deals.
//!
//! ```text
//! services / http handlers
//!          │
//!          ▼
//! repository traits (FullRepository)
//!          │
//!    ┌─────┴──────┐
//!    ▼            ▼
//!  local       postgres
//! (memory)    (Diesel + r2d2)
//! ```
//!
//! Backends are created through [`RepositoryFactory`] and shared as
//! `Arc<dyn FullRepository>`.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use checksum::calculate_checksum;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    DatasetRepository, DealRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, RestaurantRepository,
};
