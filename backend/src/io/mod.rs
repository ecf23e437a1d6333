//! Reading restaurant/deal datasets from disk or memory.

pub mod challenge_json;

pub use challenge_json::{parse_challenge_json, parse_challenge_json_str, ParsedRestaurant};
