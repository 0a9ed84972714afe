//! Temperature generator
//!
//! Simulates a sensor by drawing a uniform random temperature from a fixed
//! range and rounding it to a configured number of decimal places.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{ReadingError, ReadingResult};
use super::types::Reading;

/// Largest supported rounding precision
const MAX_DECIMALS: u32 = 6;

/// Generator settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Lowest temperature that can be produced
    pub min_temp: f64,
    /// Highest temperature that can be produced
    pub max_temp: f64,
    /// Decimal places kept after rounding
    pub decimals: u32,
    /// Fixed seed for reproducible sequences
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_temp: -18.0,
            max_temp: -16.0,
            decimals: 1,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Builder method: set the temperature range
    pub fn range(mut self, min_temp: f64, max_temp: f64) -> Self {
        self.min_temp = min_temp;
        self.max_temp = max_temp;
        self
    }

    /// Builder method: set rounding precision
    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Builder method: fix the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check range and precision
    ///
    /// The span `max_temp - min_temp` must itself be finite, or uniform
    /// sampling over it is undefined.
    pub fn validate(&self) -> ReadingResult<()> {
        let span = self.max_temp - self.min_temp;
        if !span.is_finite() || self.min_temp >= self.max_temp {
            return Err(ReadingError::InvalidRange {
                min: self.min_temp,
                max: self.max_temp,
            });
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ReadingError::InvalidPrecision(self.decimals));
        }
        Ok(())
    }
}

/// Produces simulated temperature readings
pub struct TemperatureGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl TemperatureGenerator {
    /// Create a generator, seeded from the config or from OS entropy
    pub fn new(config: GeneratorConfig) -> ReadingResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self { config, rng })
    }

    /// Generator settings
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Sample a reading stamped with the current local time
    pub fn sample(&mut self) -> Reading {
        Reading::now(self.next_temperature())
    }

    /// Sample a reading stamped at `now`
    pub fn sample_at(&mut self, now: NaiveDateTime) -> Reading {
        Reading::at(self.next_temperature(), now)
    }

    /// Draw the next temperature value
    pub fn next_temperature(&mut self) -> f64 {
        let raw = self
            .rng
            .random_range(self.config.min_temp..=self.config.max_temp);
        round_to(raw, self.config.decimals).clamp(self.config.min_temp, self.config.max_temp)
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.min_temp, -18.0);
        assert_eq!(config.max_temp, -16.0);
        assert_eq!(config.decimals, 1);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_values_within_range() {
        let mut generator = TemperatureGenerator::new(GeneratorConfig::default().seed(1)).unwrap();
        for _ in 0..1000 {
            let t = generator.next_temperature();
            assert!((-18.0..=-16.0).contains(&t), "out of range: {}", t);
        }
    }

    #[test]
    fn test_values_rounded_to_one_decimal() {
        let mut generator = TemperatureGenerator::new(GeneratorConfig::default().seed(2)).unwrap();
        for _ in 0..100 {
            let t = generator.next_temperature();
            let scaled = t * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-9, "not rounded: {}", t);
        }
    }

    #[test]
    fn test_rounding_clamped_to_uneven_bounds() {
        let config = GeneratorConfig::default().range(-17.95, -17.85).seed(3);
        let mut generator = TemperatureGenerator::new(config).unwrap();
        for _ in 0..200 {
            let t = generator.next_temperature();
            assert!((-17.95..=-17.85).contains(&t), "out of range: {}", t);
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = TemperatureGenerator::new(GeneratorConfig::default().seed(42)).unwrap();
        let mut b = TemperatureGenerator::new(GeneratorConfig::default().seed(42)).unwrap();
        let xs: Vec<f64> = (0..20).map(|_| a.next_temperature()).collect();
        let ys: Vec<f64> = (0..20).map(|_| b.next_temperature()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_sample_at_uses_given_time() {
        let mut generator = TemperatureGenerator::new(GeneratorConfig::default().seed(5)).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let reading = generator.sample_at(now);
        assert_eq!(reading.timestamp, now);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let result = TemperatureGenerator::new(GeneratorConfig::default().range(-16.0, -18.0));
        assert!(matches!(result, Err(ReadingError::InvalidRange { .. })));

        let result = TemperatureGenerator::new(GeneratorConfig::default().range(-16.0, -16.0));
        assert!(matches!(result, Err(ReadingError::InvalidRange { .. })));

        let result = TemperatureGenerator::new(GeneratorConfig::default().range(f64::NAN, 0.0));
        assert!(matches!(result, Err(ReadingError::InvalidRange { .. })));
    }

    #[test]
    fn test_overflowing_span_rejected() {
        let config = GeneratorConfig::default().range(-1e308, 1e308);
        assert_eq!(
            config.validate(),
            Err(ReadingError::InvalidRange {
                min: -1e308,
                max: 1e308
            })
        );
        assert!(TemperatureGenerator::new(config).is_err());

        // Wide but representable spans still sample
        let config = GeneratorConfig::default().range(-1e300, 1e300).seed(8);
        let mut generator = TemperatureGenerator::new(config).unwrap();
        let t = generator.next_temperature();
        assert!((-1e300..=1e300).contains(&t));
    }

    #[test]
    fn test_sample_is_stamped_now() {
        let mut generator = TemperatureGenerator::new(GeneratorConfig::default().seed(6)).unwrap();
        let before = chrono::Local::now().naive_local() - chrono::Duration::seconds(1);
        let reading = generator.sample();
        let after = chrono::Local::now().naive_local();
        assert!(reading.timestamp >= before && reading.timestamp <= after);
    }

    #[test]
    fn test_invalid_precision_rejected() {
        let result = TemperatureGenerator::new(GeneratorConfig::default().decimals(9));
        assert_eq!(result.err(), Some(ReadingError::InvalidPrecision(9)));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(-17.25, 1), -17.3);
        assert_eq!(round_to(-16.04, 1), -16.0);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(2.5, 0), 3.0);
    }
}
