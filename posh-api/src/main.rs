//! POSH compliance server binary

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use posh_api::{run_server, ApiConfig, AppState};
use posh_engine::{MemoryStore, MonitorConfig, WebhookConfig, WebhookDispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api_config = ApiConfig::from_env();
    let webhook_config = WebhookConfig::from_env();
    let monitor_config = MonitorConfig::from_env();

    // TODO: swap for the SQL-backed store once the schema migration lands.
    let store = Arc::new(MemoryStore::new());
    let dispatcher = Arc::new(WebhookDispatcher::new(webhook_config, store.clone())?);

    let state = AppState::new(store, dispatcher, monitor_config);
    state.monitor.start_monitoring();

    run_server(&api_config, state).await
}
