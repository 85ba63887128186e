//! Configuration management for Screen-Automation

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Automation configuration, read once when a session starts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application binary installed on the device (apk / app / ipa)
    pub app_path: String,

    /// Automation server endpoint
    pub server_url: String,

    /// Default wait timeout in milliseconds
    pub default_timeout: u64,

    /// Default poll interval for waits in milliseconds
    pub poll_interval: u64,

    /// Retries granted to element actions after the first attempt
    pub action_retries: u32,

    /// Delay between action retries in milliseconds
    pub retry_backoff: u64,

    /// Total time budget for one retried action in milliseconds (0 disables)
    pub retry_ceiling: u64,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_path: String::new(),
            server_url: "http://127.0.0.1:4723".to_string(),
            default_timeout: 10_000,
            poll_interval: 500,
            action_retries: 3,
            retry_backoff: 0,
            retry_ceiling: 0,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(app_path) = env::var("SCREEN_APP_PATH") {
            config.app_path = app_path;
        }

        if let Ok(server_url) = env::var("SCREEN_SERVER_URL") {
            config.server_url = server_url;
        }

        if let Ok(timeout) = env::var("SCREEN_DEFAULT_TIMEOUT") {
            config.default_timeout = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid SCREEN_DEFAULT_TIMEOUT"))?;
        }

        if let Ok(poll) = env::var("SCREEN_POLL_INTERVAL") {
            config.poll_interval = poll
                .parse()
                .map_err(|_| Error::configuration("Invalid SCREEN_POLL_INTERVAL"))?;
        }

        if let Ok(retries) = env::var("SCREEN_ACTION_RETRIES") {
            config.action_retries = retries
                .parse()
                .map_err(|_| Error::configuration("Invalid SCREEN_ACTION_RETRIES"))?;
        }

        if let Ok(backoff) = env::var("SCREEN_RETRY_BACKOFF") {
            config.retry_backoff = backoff
                .parse()
                .map_err(|_| Error::configuration("Invalid SCREEN_RETRY_BACKOFF"))?;
        }

        if let Ok(ceiling) = env::var("SCREEN_RETRY_CEILING") {
            config.retry_ceiling = ceiling
                .parse()
                .map_err(|_| Error::configuration("Invalid SCREEN_RETRY_CEILING"))?;
        }

        if let Ok(log_level) = env::var("SCREEN_LOG_LEVEL") {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff)
    }

    /// `None` when no ceiling is configured
    pub fn retry_ceiling(&self) -> Option<Duration> {
        (self.retry_ceiling > 0).then(|| Duration::from_millis(self.retry_ceiling))
    }
}
