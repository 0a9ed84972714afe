//! Live Feed
//!
//! Timer-driven sampling loop. Every interval the feed draws a reading,
//! appends it to the history buffer and pushes it (and, for the trend
//! dashboard, the refitted trend line) to subscribers through the
//! connection hub.
//!
//! # Example
//!
//! ```rust,no_run
//! use antarctic_explorer::feed::{FeedConfig, LiveFeed};
//! use antarctic_explorer::websocket::{ConnectionHub, HubConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
//!     let feed = Arc::new(LiveFeed::new(FeedConfig::default(), hub)?);
//!
//!     let handle = feed.start();
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     println!("{:?}", feed.latest().await);
//!
//!     feed.shutdown().await;
//!     handle.await?;
//!     Ok(())
//! }
//! ```

mod snapshot;

pub use snapshot::{DashboardSnapshot, TrendView};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::{interval, MissedTickBehavior};

use crate::dashboard::DashboardVariant;
use crate::reading::{
    GeneratorConfig, HistoryBuffer, Reading, ReadingError, ReadingResult, TemperatureGenerator,
    Trend,
};
use crate::websocket::{ConnectionHub, WsEvent};

/// Live feed settings
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Time between readings
    pub interval: Duration,
    pub generator: GeneratorConfig,
    /// Number of readings kept for the table and chart
    pub history_capacity: usize,
    pub variant: DashboardVariant,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            generator: GeneratorConfig::default(),
            history_capacity: 5,
            variant: DashboardVariant::default(),
        }
    }
}

/// Owns the generator and the process-lifetime history buffer
pub struct LiveFeed {
    config: FeedConfig,
    generator: Mutex<TemperatureGenerator>,
    history: RwLock<HistoryBuffer>,
    hub: Arc<ConnectionHub>,
    tick_count: AtomicU64,
    shutdown: watch::Sender<bool>,
}

impl LiveFeed {
    /// Create a feed; nothing is sampled until `tick` or `start`
    pub fn new(config: FeedConfig, hub: Arc<ConnectionHub>) -> ReadingResult<Self> {
        if config.interval.is_zero() {
            return Err(ReadingError::InvalidInterval);
        }
        let generator = TemperatureGenerator::new(config.generator.clone())?;
        let history = HistoryBuffer::new(config.history_capacity)?;

        Ok(Self {
            config,
            generator: Mutex::new(generator),
            history: RwLock::new(history),
            hub,
            tick_count: AtomicU64::new(0),
            shutdown: watch::Sender::new(false),
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn variant(&self) -> DashboardVariant {
        self.config.variant
    }

    /// Sample one reading, record it and notify subscribers
    pub async fn tick(&self) -> Reading {
        let reading = self.generator.lock().await.sample();

        let trend = {
            let mut history = self.history.write().await;
            if let Some(evicted) = history.push(reading) {
                tracing::trace!(evicted = %evicted, "History full, dropped oldest reading");
            }

            if self.config.variant.shows_trend() {
                Trend::from_history(&history).ok()
            } else {
                None
            }
        };

        let count = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            temp = reading.temp,
            timestamp = %reading.formatted_timestamp(),
            tick = count,
            "Sampled reading"
        );

        self.hub.publish(WsEvent::reading(reading)).await;
        if let Some(trend) = trend {
            self.hub.publish(WsEvent::trend(TrendView::from(trend))).await;
        }

        reading
    }

    /// Spawn the sampling loop; the first reading is taken immediately
    pub fn start(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let feed = Arc::clone(self);

        let mut stop = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut ticker = interval(feed.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_ms = feed.config.interval.as_millis() as u64,
                variant = %feed.config.variant,
                capacity = feed.config.history_capacity,
                "Live feed started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = stop.wait_for(|stopped| *stopped) => break,
                    _ = ticker.tick() => {}
                }

                feed.tick().await;
            }

            tracing::info!(ticks = feed.tick_count(), "Live feed stopped");
        })
    }

    /// Stop the sampling loop, waking it if it is between ticks
    pub async fn shutdown(&self) {
        self.shutdown.send_replace(true);
        self.hub.publish(WsEvent::system("Live feed stopping")).await;
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Readings sampled since startup
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    /// Most recent reading, if any
    pub async fn latest(&self) -> Option<Reading> {
        self.history.read().await.latest().copied()
    }

    /// Most recent reading, or `NoReadings` before the first tick
    pub async fn require_latest(&self) -> ReadingResult<Reading> {
        self.latest().await.ok_or(ReadingError::NoReadings)
    }

    /// Buffered readings, oldest first
    pub async fn history(&self) -> Vec<Reading> {
        self.history.read().await.to_vec()
    }

    /// Best-fit line over the buffered readings
    pub async fn trend(&self) -> ReadingResult<TrendView> {
        let history = self.history.read().await;
        Trend::from_history(&history).map(TrendView::from)
    }

    /// Everything the configured dashboard variant shows
    pub async fn snapshot(&self) -> DashboardSnapshot {
        let history = self.history.read().await;
        let variant = self.config.variant;

        let trend = if variant.shows_trend() {
            Trend::from_history(&history).ok().map(TrendView::from)
        } else {
            None
        };

        DashboardSnapshot {
            variant,
            capacity: history.capacity(),
            decimals: self.config.generator.decimals,
            latest: history.latest().copied(),
            history: if variant.shows_history() {
                history.to_vec()
            } else {
                Vec::new()
            },
            trend,
            tick_count: self.tick_count(),
        }
    }
}
