//! Wall-clock time-of-day values.
//!
//! Every time the service deals with is a naive time of day with minute
//! precision. Internally it is stored as minutes since midnight so that slot
//! arithmetic stays integer-only; conversion to and from text happens here, at
//! the boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

const FORMAT_12H: &str = "%I:%M%p";
const FORMAT_24H: &str = "%H:%M";

/// Error returned when a time-of-day string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not parse time: '{input}'. Expected formats like '3:00pm', '10:30am' or '15:00', '22:00'.")]
pub struct TimeParseError {
    pub input: String,
}

/// A time of day, in whole minutes since midnight (`0..=1439`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from minutes since midnight. Returns `None` outside `0..=1439`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(TimeOfDay(minutes))
    }

    /// Build from an hour (`0..=23`) and minute (`0..=59`).
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn is_midnight(self) -> bool {
        self.0 == 0
    }

    /// Parse a user-supplied time.
    ///
    /// Surrounding whitespace is ignored. The input is upper-cased and tried
    /// first as a 12-hour clock with an AM/PM marker (`3:00pm`, `10:30AM`),
    /// then as a 24-hour clock (`15:00`).
    pub fn parse(text: &str) -> Result<Self, TimeParseError> {
        let upper = text.trim().to_uppercase();
        NaiveTime::parse_from_str(&upper, FORMAT_12H)
            .or_else(|_| NaiveTime::parse_from_str(&upper, FORMAT_24H))
            .map(Self::from)
            .map_err(|_| TimeParseError {
                input: text.to_string(),
            })
    }

    /// `HH:mm`, e.g. `09:30`, `23:00`.
    pub fn format_24h(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// `h:mmA` upper-case, e.g. `9:30AM`, `12:00PM`.
    pub fn format_12h(self) -> String {
        let (hour12, marker) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{}:{:02}{}", hour12, self.minute(), marker)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Seconds and sub-second precision are truncated.
    fn from(time: NaiveTime) -> Self {
        TimeOfDay((time.hour() * 60 + time.minute()) as u16)
    }
}

impl From<TimeOfDay> for NaiveTime {
    fn from(time: TimeOfDay) -> Self {
        time.to_naive_time()
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format_24h())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).map_err(serde::de::Error::custom)
    }
}
