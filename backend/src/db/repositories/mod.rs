//! Repository implementations.
//!
//! - `local`: in-memory store for development and tests
//! - `postgres`: Diesel-backed store (feature `postgres-repo`)
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PoolStats, PostgresConfig, PostgresRepository};
