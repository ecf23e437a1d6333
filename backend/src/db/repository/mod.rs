//! Repository trait definitions for deal storage.
//!
//! Responsibilities are split across focused traits so each backend can be
//! tested piece by piece:
//!
//! - [`RestaurantRepository`]: health and restaurant records
//! - [`DealRepository`]: deal records and time-of-day queries
//! - [`DatasetRepository`]: bookkeeping for loaded seed datasets
//!
//! Use [`FullRepository`] as the bound when a caller needs all of them.

pub mod dataset;
pub mod deal;
pub mod error;
pub mod restaurant;

pub use dataset::DatasetRepository;
pub use deal::DealRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use restaurant::RestaurantRepository;

/// Composite bound for a complete repository implementation.
///
/// Implemented automatically for every type implementing the three traits.
pub trait FullRepository: RestaurantRepository + DealRepository + DatasetRepository {}

impl<T> FullRepository for T where T: RestaurantRepository + DealRepository + DatasetRepository {}
