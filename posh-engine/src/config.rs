//! Engine configuration
//!
//! Supports loading from environment variables with a POSH_ prefix.

use serde::{Deserialize, Serialize};
use std::env;

/// Outbound webhook configuration
///
/// Environment variables:
/// - POSH_WEBHOOK_BASE_URL: automation endpoint base URL
/// - POSH_WEBHOOK_API_KEY: optional bearer token
/// - POSH_WEBHOOK_SOURCE: source tag stamped on every payload
/// - POSH_WEBHOOK_TIMEOUT_SECS: request timeout in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Base URL of the workflow-automation service
    pub base_url: String,
    /// Optional API key, sent as a bearer token when present
    pub api_key: Option<String>,
    /// Fixed source tag added to every payload
    pub source: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5678/webhook".to_string(),
            api_key: None,
            source: "posh-compliance".to_string(),
            timeout_secs: 30,
        }
    }
}

impl WebhookConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("POSH_WEBHOOK_BASE_URL").unwrap_or(defaults.base_url),
            api_key: env::var("POSH_WEBHOOK_API_KEY").ok().filter(|s| !s.is_empty()),
            source: env::var("POSH_WEBHOOK_SOURCE").unwrap_or(defaults.source),
            timeout_secs: env::var("POSH_WEBHOOK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Deadline monitor configuration
///
/// Environment variables:
/// - POSH_MONITOR_SCAN_INTERVAL_SECS: seconds between scans
/// - POSH_MONITOR_STARTUP_DELAY_SECS: delay before the first scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between recurring scans
    pub scan_interval_secs: u64,
    /// Delay before the initial scan, to avoid colliding with bootstrap
    pub startup_delay_secs: u64,
    /// Alerting window: deadlines due within this many days are approaching
    pub approach_window_days: i64,
    /// Fetch window: superset of the alerting window queried per scan
    pub fetch_window_days: i64,
    /// Standard investigation window attached at case creation
    pub investigation_window_days: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 3600,
            startup_delay_secs: 10,
            approach_window_days: 7,
            fetch_window_days: 14,
            investigation_window_days: 90,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            scan_interval_secs: env::var("POSH_MONITOR_SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.scan_interval_secs),
            startup_delay_secs: env::var("POSH_MONITOR_STARTUP_DELAY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.startup_delay_secs),
            ..defaults
        }
    }
}
