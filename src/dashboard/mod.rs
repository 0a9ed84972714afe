//! Dashboard
//!
//! The three incremental versions of the dashboard and the HTML page that
//! renders them in a browser.
//!
//! | Variant   | Widgets                                          |
//! |-----------|--------------------------------------------------|
//! | `basic`   | current temperature, current date and time       |
//! | `history` | `basic` + data table of the history buffer       |
//! | `trend`   | `history` + trend chart with a best-fit line      |

mod page;

pub use page::{render_page, PageOptions};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which version of the dashboard is running
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DashboardVariant {
    /// Latest reading only
    Basic,
    /// Latest reading plus the history table
    History,
    /// History table plus trend chart
    #[default]
    Trend,
}

impl DashboardVariant {
    pub fn shows_history(&self) -> bool {
        matches!(self, DashboardVariant::History | DashboardVariant::Trend)
    }

    pub fn shows_trend(&self) -> bool {
        matches!(self, DashboardVariant::Trend)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardVariant::Basic => "basic",
            DashboardVariant::History => "history",
            DashboardVariant::Trend => "trend",
        }
    }
}

impl fmt::Display for DashboardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(DashboardVariant::Basic),
            "history" | "table" => Ok(DashboardVariant::History),
            "trend" | "chart" => Ok(DashboardVariant::Trend),
            other => Err(format!("Unknown dashboard variant: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags() {
        assert!(!DashboardVariant::Basic.shows_history());
        assert!(!DashboardVariant::Basic.shows_trend());
        assert!(DashboardVariant::History.shows_history());
        assert!(!DashboardVariant::History.shows_trend());
        assert!(DashboardVariant::Trend.shows_history());
        assert!(DashboardVariant::Trend.shows_trend());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("basic".parse::<DashboardVariant>(), Ok(DashboardVariant::Basic));
        assert_eq!(
            "History".parse::<DashboardVariant>(),
            Ok(DashboardVariant::History)
        );
        assert_eq!(
            " chart ".parse::<DashboardVariant>(),
            Ok(DashboardVariant::Trend)
        );
        assert!("gauges".parse::<DashboardVariant>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DashboardVariant::History).unwrap();
        assert_eq!(json, "\"history\"");
        let v: DashboardVariant = serde_json::from_str("\"trend\"").unwrap();
        assert_eq!(v, DashboardVariant::Trend);
    }

    #[test]
    fn test_default_is_trend() {
        assert_eq!(DashboardVariant::default(), DashboardVariant::Trend);
    }
}
