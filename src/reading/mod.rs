//! Readings
//!
//! Everything about a single simulated temperature reading and the small
//! amount of math done over recent readings:
//!
//! - **types**: `Reading` (temperature + second-resolution timestamp)
//! - **generator**: Random temperature generator within a configured range
//! - **history**: Fixed-capacity FIFO buffer of recent readings
//! - **trend**: Ordinary least squares fit over the buffer
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use antarctic_explorer::reading::{GeneratorConfig, HistoryBuffer, TemperatureGenerator, Trend};
//!
//! let mut generator = TemperatureGenerator::new(GeneratorConfig::default().seed(7)).unwrap();
//! let mut history = HistoryBuffer::new(5).unwrap();
//!
//! for _ in 0..8 {
//!     history.push(generator.sample());
//! }
//!
//! assert_eq!(history.len(), 5);
//! let trend = Trend::from_history(&history).unwrap();
//! assert_eq!(trend.sample_size, 5);
//! ```

pub mod error;
pub mod generator;
pub mod history;
pub mod trend;
pub mod types;

pub use error::{ReadingError, ReadingResult};
pub use generator::{GeneratorConfig, TemperatureGenerator};
pub use history::HistoryBuffer;
pub use trend::{Trend, TrendDirection};
pub use types::{Reading, TIMESTAMP_FORMAT};
