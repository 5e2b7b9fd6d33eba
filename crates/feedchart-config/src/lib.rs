//! Configuration for feedchart.
//!
//! Every setting has a built-in default, so the dashboard runs without a
//! config file. An optional YAML file (`~/.feedchart/config.yaml`, or the
//! path given with `--config`) overrides the defaults, and command line flags
//! override the file.
//!
//! ```yaml
//! feed:
//!   endpoint: ws://192.168.1.102:8080
//!   reconnect_delay_ms: 2000
//!   channel_buffer: 256
//! dashboard:
//!   tick_ms: 1000
//!   bar_width: 9
//!   bar_gap: 2
//! logging:
//!   dir: /var/log/feedchart
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use feedchart_core::{FeedChartError, Result};
use serde::Deserialize;
use tracing::debug;

/// Endpoint of the counting device on the shop-floor network.
pub const DEFAULT_ENDPOINT: &str = "ws://192.168.1.102:8080";

/// Fixed wait between a disconnect and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 2000;

/// Bounds accepted for the reconnect delay.
pub const MIN_RECONNECT_DELAY_MS: u64 = 100;
pub const MAX_RECONNECT_DELAY_MS: u64 = 60_000;

/// Default config file path (`~/.feedchart/config.yaml`).
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".feedchart").join("config.yaml"))
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    /// Data feed connection settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Dashboard rendering settings
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Data feed connection settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FeedConfig {
    /// WebSocket URL of the data source.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Delay before reconnecting after a disconnect, in milliseconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,

    /// Capacity of the listener to dashboard event channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reconnect_delay_ms: default_reconnect_delay(),
            channel_buffer: default_channel_buffer(),
        }
    }
}

impl FeedConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_reconnect_delay() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

fn default_channel_buffer() -> usize {
    256
}

/// Dashboard rendering settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// Clock/status refresh interval in milliseconds.
    #[serde(default = "default_tick")]
    pub tick_ms: u64,

    /// Width of each bar in terminal cells.
    #[serde(default = "default_bar_width")]
    pub bar_width: u16,

    /// Gap between bars in terminal cells.
    #[serde(default = "default_bar_gap")]
    pub bar_gap: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick(),
            bar_width: default_bar_width(),
            bar_gap: default_bar_gap(),
        }
    }
}

impl DashboardConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn default_tick() -> u64 {
    1000
}

fn default_bar_width() -> u16 {
    9
}

fn default_bar_gap() -> u16 {
    2
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log directory (defaults to `~/.feedchart/logs/`).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub reconnect_delay_ms: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// path is used if present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FeedChartError::config_not_found_with_source(path, e)
            } else {
                FeedChartError::io("reading config", path, e)
            }
        })?;
        let config = Self::parse(&content).map_err(|message| FeedChartError::ConfigInvalid {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Config>(content).map_err(|e| e.to_string())
    }

    /// Apply command line overrides on top of file values.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(endpoint) = overrides.endpoint {
            self.feed.endpoint = endpoint;
        }
        if let Some(delay) = overrides.reconnect_delay_ms {
            self.feed.reconnect_delay_ms = delay;
        }
        if let Some(dir) = overrides.log_dir {
            self.logging.dir = Some(dir);
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.feed.endpoint.trim();
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(FeedChartError::config_validation(format!(
                "feed.endpoint must start with ws:// or wss://, got '{}'",
                self.feed.endpoint
            )));
        }

        let delay = self.feed.reconnect_delay_ms;
        if !(MIN_RECONNECT_DELAY_MS..=MAX_RECONNECT_DELAY_MS).contains(&delay) {
            return Err(FeedChartError::config_validation(format!(
                "feed.reconnect_delay_ms must be between {MIN_RECONNECT_DELAY_MS} and {MAX_RECONNECT_DELAY_MS}, got {delay}"
            )));
        }

        if self.feed.channel_buffer == 0 {
            return Err(FeedChartError::config_validation(
                "feed.channel_buffer must be greater than 0",
            ));
        }

        if self.dashboard.tick_ms == 0 {
            return Err(FeedChartError::config_validation(
                "dashboard.tick_ms must be greater than 0",
            ));
        }

        if self.dashboard.bar_width == 0 {
            return Err(FeedChartError::config_validation(
                "dashboard.bar_width must be at least 1",
            ));
        }

        Ok(())
    }
}
