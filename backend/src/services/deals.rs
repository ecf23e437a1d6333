//! Deal lookups by time of day.

use crate::db::repository::{DealRepository, RepositoryResult};
use crate::models::{ActiveDeal, TimeOfDay};

/// Available deals active at `time`, ordered by restaurant name and then by
/// deal object id.
pub async fn active_deals_at<R>(repo: &R, time: TimeOfDay) -> RepositoryResult<Vec<ActiveDeal>>
where
    R: DealRepository + ?Sized,
{
    let mut deals = repo.find_active_deals_at(time).await?;
    deals.sort_by(|a, b| {
        a.restaurant
            .name
            .cmp(&b.restaurant.name)
            .then_with(|| a.deal.object_id.cmp(&b.deal.object_id))
    });
    log::debug!("{} active deals at {}", deals.len(), time);
    Ok(deals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::RestaurantRepository;
    use crate::models::{Deal, Restaurant};

    fn t(hour: u16, minute: u16) -> TimeOfDay {
        TimeOfDay::from_hm(hour, minute).unwrap()
    }

    fn restaurant(object_id: &str, name: &str) -> Restaurant {
        Restaurant {
            id: None,
            object_id: object_id.to_string(),
            name: name.to_string(),
            address1: String::new(),
            suburb: String::new(),
            cuisines: vec![],
            image_link: None,
            open: t(9, 0),
            close: t(23, 0),
            is_deleted: false,
        }
    }

    fn deal(object_id: &str, r: &Restaurant, qty_left: i32) -> Deal {
        Deal {
            id: None,
            object_id: object_id.to_string(),
            restaurant_object_id: r.object_id.clone(),
            restaurant_name: r.name.clone(),
            description: None,
            discount: 20.0,
            dine_in: false,
            lightning: false,
            qty_left,
            start: t(12, 0),
            end: t(14, 0),
            is_deleted: false,
        }
    }

    #[tokio::test]
    async fn test_orders_by_restaurant_then_deal() {
        let repo = LocalRepository::new();
        let zed = repo.store_restaurant(&restaurant("r1", "Zed's")).await.unwrap();
        let abe = repo.store_restaurant(&restaurant("r2", "Abe's")).await.unwrap();
        repo.store_deal(&deal("d3", &zed, 1)).await.unwrap();
        repo.store_deal(&deal("d2", &abe, 1)).await.unwrap();
        repo.store_deal(&deal("d1", &abe, 1)).await.unwrap();
        repo.store_deal(&deal("d0", &abe, 0)).await.unwrap();

        let deals = active_deals_at(&repo, t(13, 0)).await.unwrap();
        let ids: Vec<_> = deals.iter().map(|d| d.deal.object_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);

        assert!(active_deals_at(&repo, t(15, 0)).await.unwrap().is_empty());
    }
}
