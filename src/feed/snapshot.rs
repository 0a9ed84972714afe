//! Dashboard snapshot types
//!
//! What the dashboard page, the REST API and the WebSocket `snapshot`
//! message show at one instant.

use serde::Serialize;

use crate::dashboard::DashboardVariant;
use crate::reading::{Reading, Trend};

/// Trend fit plus the fitted values for charting
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendView {
    #[serde(flatten)]
    pub trend: Trend,
    /// Fitted temperature at each history index, oldest first
    pub fitted_line: Vec<f64>,
}

impl From<Trend> for TrendView {
    fn from(trend: Trend) -> Self {
        let fitted_line = trend.fitted_line();
        Self { trend, fitted_line }
    }
}

/// Everything the current dashboard variant displays
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub variant: DashboardVariant,
    /// History buffer capacity
    pub capacity: usize,
    /// Decimal places temperatures are shown with
    pub decimals: u32,
    pub latest: Option<Reading>,
    /// Oldest first; empty for the basic dashboard
    pub history: Vec<Reading>,
    /// Present only for the trend dashboard once two readings exist
    pub trend: Option<TrendView>,
    /// Readings sampled since startup
    pub tick_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_view_flattens() {
        let view = TrendView::from(Trend::fit(&[-17.0, -16.5, -16.0]).unwrap());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["sample_size"], 3);
        assert_eq!(json["direction"], "rising");
        assert_eq!(json["fitted_line"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_snapshot_serializes() {
        let snapshot = DashboardSnapshot {
            variant: DashboardVariant::Basic,
            capacity: 5,
            decimals: 1,
            latest: None,
            history: Vec::new(),
            trend: None,
            tick_count: 0,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["variant"], "basic");
        assert_eq!(json["decimals"], 1);
        assert!(json["latest"].is_null());
        assert!(json["trend"].is_null());
    }
}
