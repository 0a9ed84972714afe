//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiConfig as ServerConfig;
use crate::dashboard::{DashboardVariant, PageOptions};
use crate::feed::FeedConfig as LiveFeedConfig;
use crate::reading::GeneratorConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulated sensor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_min_temp")]
    pub min_temp: f64,

    #[serde(default = "default_max_temp")]
    pub max_temp: f64,

    #[serde(default = "default_decimals")]
    pub decimals: u32,

    pub seed: Option<u64>,
}

fn default_interval_secs() -> u64 {
    1
}

fn default_min_temp() -> f64 {
    -18.0
}

fn default_max_temp() -> f64 {
    -16.0
}

fn default_decimals() -> u32 {
    1
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            min_temp: default_min_temp(),
            max_temp: default_max_temp(),
            decimals: default_decimals(),
            seed: None,
        }
    }
}

/// History buffer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    5
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Dashboard page configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub variant: DashboardVariant,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_subtitle")]
    pub subtitle: String,
}

fn default_title() -> String {
    "Antarctic Explorer".to_string()
}

fn default_subtitle() -> String {
    "A demonstration of real-time temperature readings in Antarctica.".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            variant: DashboardVariant::default(),
            title: default_title(),
            subtitle: default_subtitle(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("antarctic-explorer").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file that parses, warning about broken ones
    pub fn load_first(config_paths: &[PathBuf]) -> Self {
        for path_opt in config_paths {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (environment in production)
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(host) = lookup("ANTARCTIC_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("ANTARCTIC_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Feed overrides
        if let Some(secs) = lookup("ANTARCTIC_INTERVAL_SECS").and_then(|s| s.parse().ok()) {
            self.feed.interval_secs = secs;
        }
        if let Some(seed) = lookup("ANTARCTIC_SEED").and_then(|s| s.parse().ok()) {
            self.feed.seed = Some(seed);
        }

        // History overrides
        if let Some(capacity) = lookup("ANTARCTIC_HISTORY_CAPACITY").and_then(|s| s.parse().ok())
        {
            self.history.capacity = capacity;
        }

        // Dashboard overrides
        if let Some(variant) = lookup("ANTARCTIC_VARIANT") {
            match variant.parse::<DashboardVariant>() {
                Ok(v) => self.dashboard.variant = v,
                Err(e) => tracing::warn!("Ignoring ANTARCTIC_VARIANT: {}", e),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("ANTARCTIC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ANTARCTIC_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Check values that would otherwise fail later at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "feed.interval_secs must be at least 1".to_string(),
            ));
        }
        self.generator_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("feed: {}", e)))?;
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Generator settings from the `[feed]` section
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            min_temp: self.feed.min_temp,
            max_temp: self.feed.max_temp,
            decimals: self.feed.decimals,
            seed: self.feed.seed,
        }
    }

    /// Live feed settings from `[feed]`, `[history]` and `[dashboard]`
    pub fn live_feed_config(&self) -> LiveFeedConfig {
        LiveFeedConfig {
            interval: Duration::from_secs(self.feed.interval_secs),
            generator: self.generator_config(),
            history_capacity: self.history.capacity,
            variant: self.dashboard.variant,
        }
    }

    /// HTTP server settings
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.api.host.clone(),
            port: self.api.port,
            cors_origins: self.api.cors_origins.clone(),
        }
    }

    /// Dashboard page settings
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            title: self.dashboard.title.clone(),
            subtitle: self.dashboard.subtitle.clone(),
            variant: self.dashboard.variant,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Antarctic Explorer Configuration
#
# Environment variables override these settings:
# - ANTARCTIC_API_HOST
# - ANTARCTIC_API_PORT
# - ANTARCTIC_INTERVAL_SECS
# - ANTARCTIC_SEED
# - ANTARCTIC_HISTORY_CAPACITY
# - ANTARCTIC_VARIANT
# - ANTARCTIC_LOG_LEVEL
# - ANTARCTIC_LOG_FORMAT

[feed]
# Seconds between readings
interval_secs = 1

# Simulated temperature range (degrees Celsius)
min_temp = -18.0
max_temp = -16.0

# Decimal places kept in each reading
decimals = 1

# Fixed random seed for reproducible readings
# seed = 42

[history]
# Number of recent readings kept for the table and chart
capacity = 5

[dashboard]
# Dashboard version: basic, history or trend
variant = "trend"

title = "Antarctic Explorer"
subtitle = "A demonstration of real-time temperature readings in Antarctica."

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 8000

# Allowed CORS origins (empty = same origin only)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.feed.interval_secs, 1);
        assert_eq!(config.feed.min_temp, -18.0);
        assert_eq!(config.feed.max_temp, -16.0);
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.dashboard.variant, DashboardVariant::Trend);
        assert_eq!(config.api.port, 8000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.dashboard.title, "Antarctic Explorer");
        assert!(config.feed.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nvariant = \"basic\"\n\n[feed]\nseed = 7").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dashboard.variant, DashboardVariant::Basic);
        assert_eq!(config.feed.seed, Some(7));
        assert_eq!(config.feed.interval_secs, 1);
        assert_eq!(config.history.capacity, 5);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[history\ncapacity = ").unwrap();
        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ANTARCTIC_API_PORT", "9001"),
            ("ANTARCTIC_VARIANT", "history"),
            ("ANTARCTIC_HISTORY_CAPACITY", "10"),
            ("ANTARCTIC_SEED", "3"),
            ("ANTARCTIC_INTERVAL_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9001);
        assert_eq!(config.dashboard.variant, DashboardVariant::History);
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.feed.seed, Some(3));
        // Unparseable values are ignored
        assert_eq!(config.feed.interval_secs, 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.history.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.feed.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.feed.min_temp = -10.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());

        // Each bound is finite but the span overflows
        let mut config = Config::default();
        config.feed.min_temp = -1e308;
        config.feed.max_temp = 1e308;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_first_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[feed\n").unwrap();
        std::fs::write(&good, "[history]\ncapacity = 9\n").unwrap();

        let config = Config::load_first(&[dir.path().join("missing.toml"), broken, good]);
        assert_eq!(config.history.capacity, 9);
    }

    #[test]
    fn test_live_feed_config() {
        let mut config = Config::default();
        config.feed.interval_secs = 2;
        config.history.capacity = 8;

        let feed = config.live_feed_config();
        assert_eq!(feed.interval, Duration::from_secs(2));
        assert_eq!(feed.history_capacity, 8);
        assert_eq!(feed.generator.min_temp, -18.0);
    }
}
