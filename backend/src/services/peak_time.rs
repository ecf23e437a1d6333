//! Peak activity window over all valid deals.

use log::{debug, warn};

use crate::algorithms::peak::{compute_peak_window_with, ActiveInterval, PeakWindow, SlotGrid};
use crate::db::repository::{DealRepository, RepositoryResult};

/// Fetch every valid deal and compute the window where the most of them
/// overlap.
///
/// Deals whose window cannot form an interval (zero length) are skipped with
/// a warning. Returns `Ok(None)` when no deal contributes.
pub async fn calculate_peak_time_window<R>(
    repo: &R,
    grid: SlotGrid,
) -> RepositoryResult<Option<PeakWindow>>
where
    R: DealRepository + ?Sized,
{
    let deals = repo.find_all_valid_deals().await?;

    let intervals: Vec<ActiveInterval> = deals
        .iter()
        .filter_map(|d| match ActiveInterval::from_times(d.deal.start, d.deal.end) {
            Ok(interval) => Some(interval),
            Err(e) => {
                warn!("Skipping deal {} in peak calculation: {}", d.deal.object_id, e);
                None
            }
        })
        .collect();

    let window = compute_peak_window_with(grid, &intervals);
    match &window {
        Some(w) => debug!(
            "Peak window {}-{} with {} overlapping deals ({} intervals)",
            w.start(),
            w.end(),
            w.max_count(),
            intervals.len()
        ),
        None => debug!("No peak window ({} intervals)", intervals.len()),
    }
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::RestaurantRepository;
    use crate::models::{Deal, Restaurant, TimeOfDay};

    fn t(hour: u16, minute: u16) -> TimeOfDay {
        TimeOfDay::from_hm(hour, minute).unwrap()
    }

    async fn seeded(windows: &[((u16, u16), (u16, u16), bool)]) -> LocalRepository {
        let repo = LocalRepository::new();
        let r = Restaurant {
            id: None,
            object_id: "r1".to_string(),
            name: "Test".to_string(),
            address1: String::new(),
            suburb: String::new(),
            cuisines: vec![],
            image_link: None,
            open: t(0, 0),
            close: t(0, 0),
            is_deleted: false,
        };
        repo.store_restaurant(&r).await.unwrap();
        for (i, (start, end, deleted)) in windows.iter().enumerate() {
            repo.store_deal(&Deal {
                id: None,
                object_id: format!("d{}", i),
                restaurant_object_id: "r1".to_string(),
                restaurant_name: "Test".to_string(),
                description: None,
                discount: 10.0,
                dine_in: false,
                lightning: false,
                qty_left: 0,
                start: t(start.0, start.1),
                end: t(end.0, end.1),
                is_deleted: *deleted,
            })
            .await
            .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_empty_repository_has_no_peak() {
        let repo = LocalRepository::new();
        let window = calculate_peak_time_window(&repo, SlotGrid::default())
            .await
            .unwrap();
        assert!(window.is_none());
    }

    #[tokio::test]
    async fn test_deleted_deals_are_ignored_but_sold_out_count() {
        let repo = seeded(&[
            ((9, 0), (11, 0), false),
            ((10, 0), (12, 0), false),
            ((10, 0), (10, 30), true),
        ])
        .await;
        let window = calculate_peak_time_window(&repo, SlotGrid::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(window.start(), t(10, 0));
        assert_eq!(window.end(), t(11, 0));
        assert_eq!(window.max_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_length_deals_are_skipped() {
        let repo = seeded(&[((10, 0), (10, 0), false)]).await;
        let window = calculate_peak_time_window(&repo, SlotGrid::default())
            .await
            .unwrap();
        assert!(window.is_none());
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let err = calculate_peak_time_window(&repo, SlotGrid::default())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
