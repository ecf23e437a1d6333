use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::models::{Deal, Restaurant, TimeOfDay};

/// Accepts a JSON number or a numeric string.
fn deserialize_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    match StringOrFloat::deserialize(deserializer)? {
        StringOrFloat::String(s) => s.trim().parse::<f64>().map_err(D::Error::custom),
        StringOrFloat::Float(f) => Ok(f),
    }
}

/// Accepts a JSON integer or an integer string.
fn deserialize_i32_lenient<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i32),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => s.trim().parse::<i32>().map_err(D::Error::custom),
        StringOrInt::Int(i) => Ok(i),
    }
}

/// Accepts a JSON bool or a string; only a case-insensitive `"true"` is true.
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrBool {
        String(String),
        Bool(bool),
    }

    Ok(match StringOrBool::deserialize(deserializer)? {
        StringOrBool::String(s) => s.trim().eq_ignore_ascii_case("true"),
        StringOrBool::Bool(b) => b,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeal {
    object_id: String,
    #[serde(default, deserialize_with = "deserialize_f64_lenient")]
    discount: f64,
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    dine_in: bool,
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    lightning: bool,
    #[serde(default, deserialize_with = "deserialize_i32_lenient")]
    qty_left: i32,
    open: Option<String>,
    close: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRestaurant {
    object_id: String,
    name: String,
    #[serde(default)]
    address1: String,
    #[serde(default)]
    suburb: String,
    #[serde(default)]
    cuisines: Vec<String>,
    image_link: Option<String>,
    open: String,
    close: String,
    #[serde(default)]
    deals: Vec<RawDeal>,
}

/// Container for the JSON file structure
#[derive(Debug, Deserialize)]
struct ChallengeJson {
    restaurants: Vec<RawRestaurant>,
}

/// A restaurant together with the deals it offers, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRestaurant {
    pub restaurant: Restaurant,
    pub deals: Vec<Deal>,
}

/// Parse a challenge-format JSON file.
pub fn parse_challenge_json(json_path: &Path) -> Result<Vec<ParsedRestaurant>> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    parse_challenge_json_str(&json_content)
}

/// Parse challenge-format JSON from a string.
///
/// Fails on the first malformed restaurant or deal; nothing is returned
/// partially.
pub fn parse_challenge_json_str(json_str: &str) -> Result<Vec<ParsedRestaurant>> {
    let json_value: serde_json::Value =
        serde_json::from_str(json_str).context("Invalid JSON syntax")?;

    if json_value.get("restaurants").is_none() {
        anyhow::bail!(
            "JSON must contain a 'restaurants' key. Found keys: {:?}",
            json_value.as_object().map(|o| o.keys().collect::<Vec<_>>())
        );
    }

    let raw: ChallengeJson = serde_json::from_value(json_value)
        .context("JSON deserialization error")?;

    raw.restaurants
        .into_iter()
        .enumerate()
        .map(|(idx, r)| {
            let object_id = r.object_id.clone();
            convert_restaurant(r)
                .with_context(|| format!("Error in restaurant at index {} ({})", idx, object_id))
        })
        .collect()
}

fn parse_time(field: &str, text: &str) -> Result<TimeOfDay> {
    TimeOfDay::parse(text).with_context(|| format!("Invalid '{}' time", field))
}

fn convert_restaurant(raw: RawRestaurant) -> Result<ParsedRestaurant> {
    let open = parse_time("open", &raw.open)?;
    let close = parse_time("close", &raw.close)?;

    let restaurant = Restaurant {
        id: None,
        object_id: raw.object_id,
        name: raw.name,
        address1: raw.address1,
        suburb: raw.suburb,
        cuisines: raw.cuisines.iter().map(|c| c.trim().to_string()).collect(),
        image_link: raw.image_link,
        open,
        close,
        is_deleted: false,
    };

    let deals = raw
        .deals
        .into_iter()
        .map(|d| {
            let object_id = d.object_id.clone();
            convert_deal(d, &restaurant)
                .with_context(|| format!("Error in deal {}", object_id))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedRestaurant { restaurant, deals })
}

/// The deal window falls back from `start`/`end` to the deal's own
/// `open`/`close`, then to the restaurant's hours.
fn convert_deal(raw: RawDeal, restaurant: &Restaurant) -> Result<Deal> {
    let start = match raw.start.as_deref().or(raw.open.as_deref()) {
        Some(text) => parse_time("start", text)?,
        None => restaurant.open,
    };
    let end = match raw.end.as_deref().or(raw.close.as_deref()) {
        Some(text) => parse_time("end", text)?,
        None => restaurant.close,
    };

    Ok(Deal {
        id: None,
        object_id: raw.object_id,
        restaurant_object_id: restaurant.object_id.clone(),
        restaurant_name: restaurant.name.clone(),
        description: None,
        discount: raw.discount,
        dine_in: raw.dine_in,
        lightning: raw.lightning,
        qty_left: raw.qty_left,
        start,
        end,
        is_deleted: false,
    })
}
