//! Peak activity window calculation.
//!
//! The day is cut into fixed-size slots (30 minutes by default, 48 slots).
//! Every active interval credits the slots it touches, wrapping past midnight
//! when its end is earlier than its start. The peak window is the longest run
//! of consecutive slots holding the highest tally; when several runs are
//! equally long the earliest one wins.
//!
//! Two boundary rules apply when mapping an interval onto slots:
//!
//! - an `end` of `00:00` means the end of the day, so the interval credits
//!   through the last slot rather than wrapping to slot 0;
//! - `00:00`–`00:00` therefore covers the whole day.
//!
//! Only the tally step wraps. The longest-run scan walks slot 0 to N-1 and
//! never joins a run at the end of the day with one at the start.

use serde::{Deserialize, Serialize};

use crate::models::time::{TimeOfDay, MINUTES_PER_DAY};

/// Default slot width in minutes.
pub const DEFAULT_SLOT_MINUTES: u16 = 30;

/// Boundary validation failures for intervals and slot grids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("minute value {0} is outside 0..=1439")]
    OutOfRange(u16),

    #[error("zero-length interval at minute {0}; only 00:00-00:00 may start and end together")]
    ZeroLength(u16),

    #[error("slot width of {0} minutes does not evenly divide a day")]
    InvalidSlotWidth(u16),
}

/// Span of the day during which one deal is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveInterval {
    start: u16,
    end: u16,
}

impl ActiveInterval {
    /// Validate and build an interval from minutes since midnight.
    pub fn new(start: u16, end: u16) -> Result<Self, IntervalError> {
        if start >= MINUTES_PER_DAY {
            return Err(IntervalError::OutOfRange(start));
        }
        if end >= MINUTES_PER_DAY {
            return Err(IntervalError::OutOfRange(end));
        }
        if start == end && start != 0 {
            return Err(IntervalError::ZeroLength(start));
        }
        Ok(Self { start, end })
    }

    pub fn from_times(start: TimeOfDay, end: TimeOfDay) -> Result<Self, IntervalError> {
        Self::new(start.minutes(), end.minutes())
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// End in "day minutes" where a midnight end reads as 1440.
    fn effective_end(&self) -> u16 {
        if self.end == 0 {
            MINUTES_PER_DAY
        } else {
            self.end
        }
    }

    /// True when the interval crosses midnight into the next day.
    pub fn wraps(&self) -> bool {
        self.start > self.effective_end()
    }
}

/// Partition of the day into equal slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    slot_minutes: u16,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

impl SlotGrid {
    pub fn new(slot_minutes: u16) -> Result<Self, IntervalError> {
        if slot_minutes == 0 || MINUTES_PER_DAY % slot_minutes != 0 {
            return Err(IntervalError::InvalidSlotWidth(slot_minutes));
        }
        Ok(Self { slot_minutes })
    }

    pub fn slot_minutes(&self) -> u16 {
        self.slot_minutes
    }

    pub fn slot_count(&self) -> usize {
        usize::from(MINUTES_PER_DAY / self.slot_minutes)
    }

    fn slot_of(&self, minute: u16) -> usize {
        usize::from(minute / self.slot_minutes)
    }

    /// Inclusive `(first, last)` slot indices an interval touches, ignoring wrap.
    fn slot_bounds(&self, interval: &ActiveInterval) -> (usize, usize) {
        let first = self.slot_of(interval.start);
        let last = if interval.end == 0 {
            self.slot_count() - 1
        } else {
            self.slot_of(interval.end - 1)
        };
        (first, last)
    }

    /// Start of `slot` as a time of day. `slot == slot_count()` maps to midnight.
    fn slot_start(&self, slot: usize) -> TimeOfDay {
        let minutes = (slot * usize::from(self.slot_minutes)) % usize::from(MINUTES_PER_DAY);
        TimeOfDay::from_minutes(minutes as u16).unwrap_or(TimeOfDay::MIDNIGHT)
    }
}

/// Per-slot count of overlapping intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTally {
    grid: SlotGrid,
    counts: Vec<usize>,
}

impl SlotTally {
    /// Credit every slot touched by each interval.
    pub fn build(grid: SlotGrid, intervals: &[ActiveInterval]) -> Self {
        let n = grid.slot_count();
        let mut counts = vec![0usize; n];

        for interval in intervals {
            let (first, last) = grid.slot_bounds(interval);
            if interval.wraps() {
                counts[first..n].iter_mut().for_each(|c| *c += 1);
                counts[..=last].iter_mut().for_each(|c| *c += 1);
            } else {
                counts[first..=last].iter_mut().for_each(|c| *c += 1);
            }
        }

        Self { grid, counts }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn grid(&self) -> SlotGrid {
        self.grid
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Longest run of consecutive slots whose count equals `target`.
    ///
    /// Returns `(start_slot, length)`. Ties keep the earliest run. `None` if no
    /// slot matches.
    pub fn longest_run_at(&self, target: usize) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut run_start = 0;
        let mut run_len = 0;

        for (slot, &count) in self.counts.iter().enumerate() {
            if count != target {
                run_len = 0;
                continue;
            }
            if run_len == 0 {
                run_start = slot;
            }
            run_len += 1;
            // strictly longer, so an equal later run never replaces the first
            if best.map_or(true, |(_, len)| run_len > len) {
                best = Some((run_start, run_len));
            }
        }

        best
    }
}

/// Longest stretch of the day with the most simultaneously active intervals.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PeakWindow {
    grid: SlotGrid,
    start_slot: usize,
    length: usize,
    max_count: usize,
}

impl PeakWindow {
    pub fn start_slot(&self) -> usize {
        self.start_slot
    }

    /// Run length in slots, always in `1..=slot_count`.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of intervals active in every slot of the window.
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn start(&self) -> TimeOfDay {
        self.grid.slot_start(self.start_slot)
    }

    /// Exclusive end of the window; a window closing at the day boundary ends at `00:00`.
    pub fn end(&self) -> TimeOfDay {
        self.grid.slot_start(self.start_slot + self.length)
    }

    /// `(start, end)` in minutes since midnight.
    pub fn as_minutes(&self) -> (u16, u16) {
        (self.start().minutes(), self.end().minutes())
    }

    pub fn covers_full_day(&self) -> bool {
        self.length == self.grid.slot_count()
    }
}

/// Peak window over the default 30-minute grid.
pub fn compute_peak_window(intervals: &[ActiveInterval]) -> Option<PeakWindow> {
    compute_peak_window_with(SlotGrid::default(), intervals)
}

/// Peak window over `grid`. `None` when there is nothing to tally.
pub fn compute_peak_window_with(grid: SlotGrid, intervals: &[ActiveInterval]) -> Option<PeakWindow> {
    if intervals.is_empty() {
        return None;
    }

    let tally = SlotTally::build(grid, intervals);
    let max_count = tally.max_count();
    if max_count == 0 {
        return None;
    }

    let (start_slot, length) = tally.longest_run_at(max_count)?;
    Some(PeakWindow {
        grid,
        start_slot,
        length,
        max_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u16, minute: u16) -> u16 {
        hour * 60 + minute
    }

    fn iv(start: (u16, u16), end: (u16, u16)) -> ActiveInterval {
        ActiveInterval::new(hm(start.0, start.1), hm(end.0, end.1)).unwrap()
    }

    fn peak(intervals: &[ActiveInterval]) -> (String, String) {
        let window = compute_peak_window(intervals).expect("expected a peak window");
        (window.start().format_24h(), window.end().format_24h())
    }

    #[test]
    fn test_no_intervals_no_peak() {
        assert!(compute_peak_window(&[]).is_none());
    }

    #[test]
    fn test_disjoint_intervals_pick_first() {
        let intervals = [iv((9, 0), (9, 29)), iv((10, 0), (10, 29))];
        assert_eq!(peak(&intervals), ("09:00".into(), "09:30".into()));
    }

    #[test]
    fn test_single_peak_slot() {
        let intervals = [
            iv((9, 0), (10, 15)),
            iv((9, 45), (10, 45)),
            iv((10, 0), (10, 30)),
        ];
        let window = compute_peak_window(&intervals).unwrap();
        assert_eq!(window.max_count(), 3);
        assert_eq!(peak(&intervals), ("10:00".into(), "10:30".into()));
    }

    #[test]
    fn test_contiguous_peak_window() {
        let intervals = [
            iv((11, 30), (13, 30)),
            iv((11, 45), (13, 0)),
            iv((12, 0), (13, 15)),
            iv((12, 15), (12, 45)),
        ];
        assert_eq!(peak(&intervals), ("12:00".into(), "13:00".into()));
    }

    #[test]
    fn test_intervals_spanning_midnight() {
        let intervals = [
            iv((23, 0), (1, 0)),
            iv((23, 30), (0, 30)),
            iv((0, 0), (0, 45)),
        ];
        let tally = SlotTally::build(SlotGrid::default(), &intervals);
        assert_eq!(tally.counts()[46], 1);
        assert_eq!(tally.counts()[47], 2);
        assert_eq!(tally.counts()[0], 3);
        assert_eq!(tally.counts()[1], 2);
        assert_eq!(peak(&intervals), ("00:00".into(), "00:30".into()));
    }

    #[test]
    fn test_interval_ending_at_midnight() {
        let intervals = [iv((23, 0), (0, 0))];
        let tally = SlotTally::build(SlotGrid::default(), &intervals);
        assert_eq!(tally.counts().iter().sum::<usize>(), 2);
        assert_eq!(&tally.counts()[46..], &[1, 1]);
        assert_eq!(peak(&intervals), ("23:00".into(), "00:00".into()));
    }

    #[test]
    fn test_midnight_to_midnight_covers_whole_day() {
        let intervals = [iv((0, 0), (0, 0))];
        let window = compute_peak_window(&intervals).unwrap();
        assert!(window.covers_full_day());
        assert_eq!(window.length(), 48);
        assert_eq!(window.max_count(), 1);
        assert_eq!(window.as_minutes(), (0, 0));
    }

    #[test]
    fn test_equal_peaks_keep_earliest_longest() {
        let intervals = [
            iv((9, 45), (11, 15)),
            iv((10, 0), (10, 45)),
            iv((10, 15), (11, 0)),
            iv((13, 45), (15, 15)),
            iv((14, 0), (14, 45)),
            iv((14, 15), (15, 0)),
        ];
        assert_eq!(peak(&intervals), ("10:00".into(), "11:00".into()));
    }

    #[test]
    fn test_longer_later_run_beats_shorter_earlier_run() {
        let intervals = [
            iv((8, 0), (8, 30)),
            iv((8, 0), (8, 30)),
            iv((15, 0), (16, 30)),
            iv((15, 0), (16, 30)),
        ];
        assert_eq!(peak(&intervals), ("15:00".into(), "16:30".into()));
    }

    #[test]
    fn test_short_interval_snaps_to_its_slot() {
        assert_eq!(
            peak(&[iv((14, 10), (14, 20))]),
            ("14:00".into(), "14:30".into())
        );
    }

    #[test]
    fn test_interval_across_slot_boundary() {
        assert_eq!(
            peak(&[iv((13, 45), (14, 15))]),
            ("13:30".into(), "14:30".into())
        );
    }

    #[test]
    fn test_run_scan_does_not_wrap() {
        // max tally sits in 23:30 and 00:00 slots; the run at 00:00 comes first
        let intervals = [iv((23, 30), (0, 30))];
        let window = compute_peak_window(&intervals).unwrap();
        assert_eq!(window.start_slot(), 0);
        assert_eq!(window.length(), 1);
    }

    #[test]
    fn test_run_reaching_end_of_day_reports_midnight() {
        let intervals = [iv((22, 0), (0, 0)), iv((21, 0), (0, 0))];
        assert_eq!(peak(&intervals), ("22:00".into(), "00:00".into()));
    }

    #[test]
    fn test_interval_validation() {
        assert_eq!(ActiveInterval::new(1440, 0), Err(IntervalError::OutOfRange(1440)));
        assert_eq!(ActiveInterval::new(0, 2000), Err(IntervalError::OutOfRange(2000)));
        assert_eq!(ActiveInterval::new(600, 600), Err(IntervalError::ZeroLength(600)));
        assert!(ActiveInterval::new(0, 0).is_ok());
    }

    #[test]
    fn test_wrap_detection() {
        assert!(iv((23, 0), (1, 0)).wraps());
        assert!(!iv((23, 0), (0, 0)).wraps());
        assert!(!iv((0, 0), (0, 0)).wraps());
        assert!(!iv((9, 0), (17, 0)).wraps());
    }

    #[test]
    fn test_slot_grid_validation() {
        assert!(SlotGrid::new(0).is_err());
        assert!(SlotGrid::new(7).is_err());
        assert_eq!(SlotGrid::new(60).unwrap().slot_count(), 24);
        assert_eq!(SlotGrid::default().slot_count(), 48);
    }

    #[test]
    fn test_hourly_grid() {
        let grid = SlotGrid::new(60).unwrap();
        let intervals = [iv((9, 15), (10, 45)), iv((10, 0), (11, 0))];
        let window = compute_peak_window_with(grid, &intervals).unwrap();
        assert_eq!(window.as_minutes(), (hm(10, 0), hm(11, 0)));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let intervals = [iv((18, 0), (21, 0)), iv((19, 0), (23, 30)), iv((20, 0), (2, 0))];
        assert_eq!(compute_peak_window(&intervals), compute_peak_window(&intervals));
    }
}
