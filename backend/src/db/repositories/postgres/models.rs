use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{datasets, deals, restaurants};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)] // created_at is only read by operators
pub struct RestaurantRow {
    pub restaurant_id: i64,
    pub object_id: String,
    pub name: String,
    pub address1: String,
    pub suburb: String,
    pub cuisines_json: Value,
    pub image_link: Option<String>,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = restaurants)]
pub struct NewRestaurantRow {
    pub object_id: String,
    pub name: String,
    pub address1: String,
    pub suburb: String,
    pub cuisines_json: Value,
    pub image_link: Option<String>,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct DealRow {
    pub deal_id: i64,
    pub object_id: String,
    pub restaurant_object_id: String,
    pub restaurant_name: String,
    pub description: Option<String>,
    pub discount: f64,
    pub dine_in: bool,
    pub lightning: bool,
    pub qty_left: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deals)]
pub struct NewDealRow {
    pub object_id: String,
    pub restaurant_object_id: String,
    pub restaurant_name: String,
    pub description: Option<String>,
    pub discount: f64,
    pub dine_in: bool,
    pub lightning: bool,
    pub qty_left: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = datasets)]
pub struct NewDatasetRow {
    pub dataset_name: String,
    pub checksum: String,
}
