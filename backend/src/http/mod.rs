//! HTTP server exposing the deals API.
//!
//! ```text
//! axum handlers ──▶ services ──▶ repository traits
//! ```
//!
//! - `GET /health`
//! - `GET /v1/deals?timeOfDay=<time>`
//! - `GET /v1/peak-time`

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
