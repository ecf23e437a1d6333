//! Application state for the HTTP server.

use std::sync::Arc;

use crate::algorithms::peak::SlotGrid;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
    /// Slot grid used by the peak-time endpoint
    pub slot_grid: SlotGrid,
}

impl AppState {
    /// State with the default 30-minute slot grid.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_slot_grid(repository, SlotGrid::default())
    }

    pub fn with_slot_grid(repository: Arc<dyn FullRepository>, slot_grid: SlotGrid) -> Self {
        Self {
            repository,
            slot_grid,
        }
    }
}
