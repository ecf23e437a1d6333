//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::algorithms::peak::PeakWindow;
use crate::models::ActiveDeal;

/// Query string for `GET /v1/deals`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealsQuery {
    #[serde(rename = "timeOfDay")]
    pub time_of_day: Option<String>,
}

/// One active deal with its restaurant details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealResponse {
    pub restaurant_object_id: String,
    pub restaurant_name: String,
    pub restaurant_address1: String,
    /// Established wire name, spelling included.
    #[serde(rename = "restarantSuburb")]
    pub restaurant_suburb: String,
    /// `h:mmA`, e.g. `3:00PM`
    pub restaurant_open: String,
    pub restaurant_close: String,
    pub deal_object_id: String,
    pub discount: f64,
    pub dine_in: bool,
    pub lightning: bool,
    pub qty_left: i32,
}

impl From<ActiveDeal> for DealResponse {
    fn from(active: ActiveDeal) -> Self {
        let ActiveDeal { deal, restaurant } = active;
        Self {
            restaurant_object_id: restaurant.object_id,
            restaurant_name: restaurant.name,
            restaurant_address1: restaurant.address1,
            restaurant_suburb: restaurant.suburb,
            restaurant_open: restaurant.open.format_12h(),
            restaurant_close: restaurant.close.format_12h(),
            deal_object_id: deal.object_id,
            discount: deal.discount,
            dine_in: deal.dine_in,
            lightning: deal.lightning,
            qty_left: deal.qty_left,
        }
    }
}

/// Body of `GET /v1/peak-time`; both times are `HH:mm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakTimeResponse {
    pub peak_time_start: String,
    pub peak_time_end: String,
}

impl From<&PeakWindow> for PeakTimeResponse {
    fn from(window: &PeakWindow) -> Self {
        Self {
            peak_time_start: window.start().format_24h(),
            peak_time_end: window.end().format_24h(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
