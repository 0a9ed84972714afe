//! Core reading type
//!
//! A `Reading` is one simulated sensor sample: a temperature in degrees
//! Celsius and the local wall-clock time it was taken, at second resolution.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display and wire format for reading timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single temperature reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius
    pub temp: f64,
    /// Local time the reading was taken (whole seconds)
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

impl Reading {
    /// Create a reading stamped with the current local time
    pub fn now(temp: f64) -> Self {
        Self::at(temp, Local::now().naive_local())
    }

    /// Create a reading at a specific time, truncated to the second
    pub fn at(temp: f64, timestamp: NaiveDateTime) -> Self {
        Self {
            temp,
            timestamp: truncate_to_second(timestamp),
        }
    }

    /// Temperature with exactly `decimals` places, so -16.0 stays "-16.0"
    pub fn formatted_temp(&self, decimals: u32) -> String {
        format!("{:.*}", decimals as usize, self.temp)
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} C at {}", self.temp, self.formatted_timestamp())
    }
}

fn truncate_to_second(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
