use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod routes;
mod server;
mod services;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use config::AppConfig;
use services::dashboard_service::DashboardService;
use services::health_service;
use state::DashboardState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    health_service::mark_started();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("multi_data_dashboard=debug".parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📊 Starting Multi-Data Dashboard...");
    info!("  Crypto (CoinGecko) | Weather (Open-Meteo) | Stocks (simulated)");
    info!("  Multi-Data Dashboard v{}", env!("CARGO_PKG_VERSION"));
    info!("");

    info!("Loading configuration...");
    let config = match AppConfig::from_env() {
        Ok(c) => {
            info!(
                "Configuration loaded: bind {}, refresh every {}s, {} coins, {} stocks",
                c.bind_addr,
                c.refresh_interval.as_secs(),
                c.coins.len(),
                c.stock_symbols.len()
            );
            Arc::new(c)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let service = match DashboardService::new(config.clone()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };

    let state = Arc::new(DashboardState::new(config.clone(), service));
    let _refresher = server::spawn_auto_refresh(state.clone(), config.refresh_interval);

    if let Err(e) = server::serve(state).await {
        error!("Server error: {}", e);
    }
}
