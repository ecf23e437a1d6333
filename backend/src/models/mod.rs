//! Domain types shared by the repository, service and HTTP layers.

pub mod deal;
pub mod time;

pub use deal::{ActiveDeal, Deal, DealId, Restaurant, RestaurantId};
pub use time::{TimeOfDay, TimeParseError, MINUTES_PER_DAY};
