//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::dashboard::{render_page, DashboardVariant, PageOptions};
use crate::feed::LiveFeed;
use crate::websocket::ConnectionHub;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Live feed holding the reading history
    pub feed: Arc<LiveFeed>,
    /// WebSocket connection hub for real-time streaming
    pub ws_hub: Arc<ConnectionHub>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Rendered dashboard page
    pub page: Arc<String>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state around a feed and the hub it publishes to
    pub fn new(
        feed: Arc<LiveFeed>,
        ws_hub: Arc<ConnectionHub>,
        config: ApiConfig,
        page: &PageOptions,
    ) -> Self {
        Self {
            feed,
            ws_hub,
            config: Arc::new(config),
            page: Arc::new(render_page(page)),
            start_time: Instant::now(),
        }
    }

    /// Dashboard variant served by this instance
    pub fn variant(&self) -> DashboardVariant {
        self.feed.variant()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means same origin only
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addr() {
        assert_eq!(ApiConfig::default().addr(), "127.0.0.1:8000");
        assert_eq!(ApiConfig::new("0.0.0.0", 9000).addr(), "0.0.0.0:9000");
    }
}
