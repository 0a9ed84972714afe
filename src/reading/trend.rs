//! Trend line
//!
//! Ordinary least squares fit of temperature against sequence index
//! (0 for the oldest reading in the buffer). Used for the trend chart.

use serde::Serialize;

use super::error::{ReadingError, ReadingResult};
use super::history::HistoryBuffer;

/// Minimum number of readings needed for a fit
pub const MIN_TREND_POINTS: usize = 2;

/// Slopes smaller than this (degrees per reading) count as steady
const STEADY_SLOPE: f64 = 0.01;

/// Direction of the fitted line
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Steady,
}

impl TrendDirection {
    fn from_slope(slope: f64) -> Self {
        if slope.abs() < STEADY_SLOPE {
            TrendDirection::Steady
        } else if slope > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Falling
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Steady => "steady",
        }
    }
}

/// Best-fit line over a sequence of temperatures
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trend {
    /// Change in temperature per reading
    pub slope: f64,
    /// Fitted temperature at index 0
    pub intercept: f64,
    /// Pearson correlation between index and temperature (-1 to 1)
    pub r_value: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Number of readings used
    pub sample_size: usize,
    pub direction: TrendDirection,
}

impl Trend {
    /// Fit a line to `values`, indexed `0..values.len()`
    pub fn fit(values: &[f64]) -> ReadingResult<Self> {
        if values.len() < MIN_TREND_POINTS {
            return Err(ReadingError::InsufficientData {
                needed: MIN_TREND_POINTS,
                actual: values.len(),
            });
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(ReadingError::NonFinite(idx));
        }

        let n = values.len() as f64;
        let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();

        let sum_x: f64 = xs.iter().sum();
        let sum_y: f64 = values.iter().sum();
        let sum_xy: f64 = xs.iter().zip(values.iter()).map(|(x, y)| x * y).sum();
        let sum_x2: f64 = xs.iter().map(|x| x * x).sum();

        // Indices are distinct, so with n >= 2 this is strictly positive
        let denominator = n * sum_x2 - sum_x.powi(2);
        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        let r_value = pearson_correlation(&xs, values);

        Ok(Self {
            slope,
            intercept,
            r_value,
            r_squared: r_value * r_value,
            sample_size: values.len(),
            direction: TrendDirection::from_slope(slope),
        })
    }

    /// Fit a line over the buffer's temperatures, oldest first
    pub fn from_history(history: &HistoryBuffer) -> ReadingResult<Self> {
        Self::fit(&history.temperatures())
    }

    /// Fitted temperature at `index`
    pub fn predict(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }

    /// Fitted temperatures at every index used in the fit
    pub fn fitted_line(&self) -> Vec<f64> {
        (0..self.sample_size).map(|i| self.predict(i)).collect()
    }
}

/// Calculate Pearson correlation coefficient
///
/// Returns 0 when either series has no variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}
