//! # Deals Backend
//!
//! Restaurant deals service: which deals are live at a given time of day, and
//! when during the day the most deals overlap.
//!
//! ## Architecture
//!
//! - [`models`]: restaurants, deals and the [`TimeOfDay`](models::TimeOfDay) value
//! - [`algorithms`]: the peak activity window calculator
//! - [`db`]: repository traits with in-memory and Postgres backends
//! - [`io`]: parsing of challenge-format JSON datasets
//! - [`services`]: deal lookup, peak calculation and dataset ingestion
//! - [`config`]: `deals.toml` and environment configuration
//! - [`http`]: Axum REST API (feature `http-server`)

// RepositoryError carries context for logging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod config;
pub mod db;
pub mod io;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
