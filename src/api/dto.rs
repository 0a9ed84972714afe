//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::reading::Reading;

// ============================================
// READING DTOs
// ============================================

/// History buffer contents
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Maximum number of readings kept
    pub capacity: usize,
    /// Number of readings currently held
    pub count: usize,
    /// Readings, oldest first
    pub readings: Vec<Reading>,
}

/// Query parameters for the data table
#[derive(Debug, Deserialize)]
pub struct TableParams {
    /// Output format: json or csv
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "json".to_string()
}

/// One row of the data table
#[derive(Debug, Serialize, PartialEq)]
pub struct TableRow {
    /// Position in the history buffer, 0 = oldest
    pub index: usize,
    pub temp: f64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

impl TableRow {
    pub fn from_readings(readings: &[Reading]) -> Vec<TableRow> {
        readings
            .iter()
            .enumerate()
            .map(|(index, r)| TableRow {
                index,
                temp: r.temp,
                timestamp: r.formatted_timestamp(),
            })
            .collect()
    }
}

/// Data table as JSON
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or starting
    pub status: String,
    /// Feed status: running, waiting or stopped
    pub feed: String,
    /// Dashboard variant being served
    pub variant: String,
    /// Readings sampled since startup
    pub readings_sampled: u64,
    /// Open WebSocket connections
    pub ws_connections: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
