//! Restaurant and deal entities.

use serde::{Deserialize, Serialize};

use super::time::TimeOfDay;

/// Defines a newtype ID over `i64` with the conversions the stores need.
macro_rules! define_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                $name(v)
            }
        }
    };
}

define_id_type!(
    /// Store-assigned restaurant key.
    RestaurantId
);
define_id_type!(
    /// Store-assigned deal key.
    DealId
);

/// A restaurant offering deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Assigned by the repository on insert.
    pub id: Option<RestaurantId>,
    /// Unique identifier from the upstream data source.
    pub object_id: String,
    pub name: String,
    pub address1: String,
    pub suburb: String,
    pub cuisines: Vec<String>,
    pub image_link: Option<String>,
    pub open: TimeOfDay,
    pub close: TimeOfDay,
    pub is_deleted: bool,
}

/// A time-boxed deal offered by a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Assigned by the repository on insert.
    pub id: Option<DealId>,
    /// Unique identifier from the upstream data source.
    pub object_id: String,
    pub restaurant_object_id: String,
    /// Copy of the restaurant name taken at load time.
    pub restaurant_name: String,
    pub description: Option<String>,
    /// Discount in percent.
    pub discount: f64,
    pub dine_in: bool,
    pub lightning: bool,
    pub qty_left: i32,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub is_deleted: bool,
}

impl Deal {
    /// Not soft-deleted. Quantity and time are not considered.
    pub fn is_valid(&self) -> bool {
        !self.is_deleted
    }

    /// Valid and still has stock.
    pub fn is_available(&self) -> bool {
        self.is_valid() && self.qty_left > 0
    }

    /// Whether `time` falls inside the deal window, inclusive at both ends.
    ///
    /// Windows with `start > end` run past midnight. `00:00`–`00:00` is the
    /// all-day window.
    pub fn is_active_at(&self, time: TimeOfDay) -> bool {
        if self.start.is_midnight() && self.end.is_midnight() {
            return true;
        }
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

/// A deal joined with the restaurant that offers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDeal {
    pub deal: Deal,
    pub restaurant: Restaurant,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(start: (u16, u16), end: (u16, u16)) -> Deal {
        Deal {
            id: None,
            object_id: "d1".to_string(),
            restaurant_object_id: "r1".to_string(),
            restaurant_name: "Test".to_string(),
            description: None,
            discount: 10.0,
            dine_in: true,
            lightning: false,
            qty_left: 1,
            start: TimeOfDay::from_hm(start.0, start.1).unwrap(),
            end: TimeOfDay::from_hm(end.0, end.1).unwrap(),
            is_deleted: false,
        }
    }

    fn at(hour: u16, minute: u16) -> TimeOfDay {
        TimeOfDay::from_hm(hour, minute).unwrap()
    }

    #[test]
    fn test_plain_window_is_inclusive() {
        let d = deal((12, 0), (23, 0));
        assert!(d.is_active_at(at(12, 0)));
        assert!(d.is_active_at(at(23, 0)));
        assert!(!d.is_active_at(at(11, 59)));
        assert!(!d.is_active_at(at(23, 1)));
    }

    #[test]
    fn test_wrapping_window() {
        let d = deal((23, 0), (1, 0));
        assert!(d.is_active_at(at(23, 30)));
        assert!(d.is_active_at(at(0, 30)));
        assert!(d.is_active_at(at(1, 0)));
        assert!(!d.is_active_at(at(12, 0)));
    }

    #[test]
    fn test_window_ending_at_midnight() {
        let d = deal((23, 0), (0, 0));
        assert!(d.is_active_at(at(23, 59)));
        assert!(d.is_active_at(TimeOfDay::MIDNIGHT));
        assert!(!d.is_active_at(at(22, 59)));
    }

    #[test]
    fn test_all_day_window() {
        let d = deal((0, 0), (0, 0));
        assert!(d.is_active_at(at(0, 0)));
        assert!(d.is_active_at(at(13, 37)));
        assert!(d.is_active_at(at(23, 59)));
    }

    #[test]
    fn test_availability_flags() {
        let mut d = deal((9, 0), (10, 0));
        assert!(d.is_available());
        d.qty_left = 0;
        assert!(d.is_valid());
        assert!(!d.is_available());
        d.is_deleted = true;
        assert!(!d.is_valid());
    }
}
