//! Service layer.
//!
//! Services sit between the HTTP handlers and the repository traits. They
//! work with any [`FullRepository`](crate::db::FullRepository) backend.

pub mod deals;
pub mod ingest;
pub mod peak_time;

pub use deals::active_deals_at;
pub use ingest::{load_dataset, load_dataset_file, IngestSummary};
pub use peak_time::calculate_peak_time_window;
