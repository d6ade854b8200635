//! Application state for the API server

use std::env;
use std::sync::Arc;

use posh_engine::{
    CaseService, CaseStore, ComplianceReporter, DeadlineMonitor, Dispatcher, MonitorConfig,
};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Store seam, used directly by the callback endpoints
    pub store: Arc<dyn CaseStore>,
    /// Case lifecycle service
    pub cases: Arc<CaseService>,
    /// Deadline monitor
    pub monitor: Arc<DeadlineMonitor>,
    /// Compliance reporter
    pub reporter: Arc<ComplianceReporter>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Wire the services over one store and dispatcher
    pub fn new(
        store: Arc<dyn CaseStore>,
        dispatcher: Arc<dyn Dispatcher>,
        monitor_config: MonitorConfig,
    ) -> Self {
        let monitor = Arc::new(DeadlineMonitor::new(
            store.clone(),
            dispatcher.clone(),
            monitor_config,
        ));
        let cases = Arc::new(CaseService::new(
            store.clone(),
            dispatcher,
            monitor.clone(),
        ));
        let reporter = Arc::new(ComplianceReporter::new(store.clone()));

        Self {
            store,
            cases,
            monitor,
            reporter,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// API server configuration
///
/// Environment variables:
/// - POSH_API_HOST / POSH_API_PORT: bind address
/// - POSH_API_ENABLE_CORS: "false" to disable the permissive CORS layer
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("POSH_API_HOST").unwrap_or(defaults.host),
            port: env::var("POSH_API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            enable_cors: env::var("POSH_API_ENABLE_CORS")
                .map(|s| s != "false")
                .unwrap_or(defaults.enable_cors),
        }
    }
}
