use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::Http;
use hyper::service::service_fn;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::routes;
use crate::state::DashboardState;
use crate::utils::errors::DashboardError;

/// Re-run the active pipeline every `period`. Ticks that land while a
/// refresh is running are dropped.
pub fn spawn_auto_refresh(state: Arc<DashboardState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let state = state.clone();
            // a tick must not wait on a slow refresh, so each runs in its own task
            tokio::spawn(async move {
                if let Some(view) = state.refresh_on_timer().await {
                    debug!("Timer refresh finished at {}", view.last_updated);
                }
            });
        }
    })
}

/// Accept connections on the configured address until the listener fails
pub async fn serve(state: Arc<DashboardState>) -> Result<(), DashboardError> {
    let addr = state.config.bind_addr;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DashboardError::Server(format!("Failed to bind {}: {}", addr, e)))?;
    info!("Dashboard listening on http://{}", addr);

    loop {
        let (stream, peer_addr) = listener
            .accept()
            .await
            .map_err(|e| DashboardError::Server(format!("Accept failed: {}", e)))?;
        stream.set_nodelay(true).ok();

        let state = state.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| routes::handle_request(state.clone(), req));
            if let Err(e) = Http::new().serve_connection(stream, service).await {
                warn!("Error serving connection from {}: {}", peer_addr, e);
            }
        });
    }
}
