//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::{
    DEFAULT_DEDUP_TIMEOUT_SECS, DEFAULT_EXPIRY_WINDOW_SECS, DEFAULT_REFRESH_INTERVAL_SECS,
};

const DEFAULT_CATALOG_URL: &str = "http://localhost:5000/api/products";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the remote "list all products" endpoint
    pub catalog_url: String,
    /// Seconds after which cached data is considered stale
    pub expiry_window_secs: u64,
    /// Seconds between background refresh checks
    pub refresh_interval_secs: u64,
    /// Seconds an in-flight fetch keeps absorbing identical requests
    pub dedup_timeout_secs: u64,
    /// HTTP timeout in seconds for the remote catalog call
    pub request_timeout_secs: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CATALOG_URL` - Remote product list endpoint
    /// - `EXPIRY_WINDOW_SECS` - Staleness window in seconds (default: 300)
    /// - `REFRESH_INTERVAL_SECS` - Background refresh period (default: 120)
    /// - `DEDUP_TIMEOUT_SECS` - Dedup entry lifetime (default: 30)
    /// - `REQUEST_TIMEOUT_SECS` - Remote call timeout (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog_url: env::var("CATALOG_URL").unwrap_or(defaults.catalog_url),
            expiry_window_secs: parse_secs("EXPIRY_WINDOW_SECS", defaults.expiry_window_secs),
            refresh_interval_secs: parse_secs(
                "REFRESH_INTERVAL_SECS",
                defaults.refresh_interval_secs,
            ),
            dedup_timeout_secs: parse_secs("DEDUP_TIMEOUT_SECS", defaults.dedup_timeout_secs),
            request_timeout_secs: parse_secs(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like `parse_var`, but zero also falls back to the default.
fn parse_secs(name: &str, default: u64) -> u64 {
    match parse_var(name, default) {
        0 => {
            tracing::warn!("{} must be greater than zero, using {}", name, default);
            default
        }
        secs => secs,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            expiry_window_secs: DEFAULT_EXPIRY_WINDOW_SECS as u64,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            dedup_timeout_secs: DEFAULT_DEDUP_TIMEOUT_SECS as u64,
            request_timeout_secs: 10,
            server_port: 3000,
        }
    }
}
