//! # Antarctic Explorer
//!
//! A live temperature dashboard. A simulated sensor produces a reading every
//! few seconds; the most recent readings are kept in a bounded history buffer,
//! shown as a data table, and summarised by a least-squares trend line.
//!
//! ## Features
//!
//! - **Live feed**: Timer-driven sampling of a random temperature in a fixed range
//! - **Bounded history**: FIFO buffer that keeps the most recent N readings
//! - **Trend line**: Ordinary least squares fit against reading index
//! - **Real-time**: WebSocket push to the browser dashboard
//!
//! ## Modules
//!
//! - [`reading`]: Reading type, generator, history buffer and trend fit
//! - [`feed`]: Timer-driven live feed
//! - [`dashboard`]: Dashboard variants and HTML page
//! - [`api`]: HTTP API server with Axum
//! - [`websocket`]: Real-time push to dashboard pages
//!
//! ## Quick Start
//!
//! ```rust
//! use antarctic_explorer::reading::*;
//!
//! let mut generator = TemperatureGenerator::new(GeneratorConfig::default()).unwrap();
//! let mut history = HistoryBuffer::new(5).unwrap();
//!
//! for _ in 0..10 {
//!     let reading = generator.sample();
//!     assert!((-18.0..=-16.0).contains(&reading.temp));
//!     history.push(reading);
//! }
//!
//! let trend = Trend::from_history(&history).unwrap();
//! println!("{} readings, trend {}", history.len(), trend.direction.as_str());
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod reading;
pub mod websocket;

// Re-export top-level types for convenience
pub use reading::{
    GeneratorConfig, HistoryBuffer, Reading, ReadingError, ReadingResult, TemperatureGenerator,
    Trend, TrendDirection,
};

pub use feed::{DashboardSnapshot, FeedConfig, LiveFeed, TrendView};

pub use dashboard::{DashboardVariant, PageOptions};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use websocket::{
    websocket_handler, ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, WsEvent,
};

pub use config::{Config, ConfigError, LoggingConfig};
