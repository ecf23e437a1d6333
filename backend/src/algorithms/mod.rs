//! Pure computations over deal data.

pub mod peak;

pub use peak::{
    compute_peak_window, compute_peak_window_with, ActiveInterval, IntervalError, PeakWindow,
    SlotGrid, SlotTally, DEFAULT_SLOT_MINUTES,
};
