use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{Controls, DashboardView};
use crate::services::dashboard_service::DashboardService;
use crate::utils::{stats_table, RefreshGate};

/// Shared dashboard state: the current controls, the latest view and the
/// gate that keeps refreshes from overlapping
pub struct DashboardState {
    pub config: Arc<AppConfig>,
    service: DashboardService,
    controls: RwLock<Controls>,
    latest: RwLock<Option<Arc<DashboardView>>>,
    gate: RefreshGate,
}

impl DashboardState {
    pub fn new(config: Arc<AppConfig>, service: DashboardService) -> Self {
        Self {
            config,
            service,
            controls: RwLock::new(Controls::default()),
            latest: RwLock::new(None),
            gate: RefreshGate::new(),
        }
    }

    pub async fn controls(&self) -> Controls {
        self.controls.read().await.clone()
    }

    pub async fn latest(&self) -> Option<Arc<DashboardView>> {
        self.latest.read().await.clone()
    }

    /// User-triggered refresh: waits for any running refresh, then applies
    /// `controls` and recomputes
    pub async fn refresh_with(&self, controls: Controls) -> Arc<DashboardView> {
        let _permit = self.gate.enter().await;
        *self.controls.write().await = controls.clone();
        self.run(controls, "user").await
    }

    /// Timer-triggered refresh of the current controls. Dropped (returns
    /// `None`) while another refresh is running.
    pub async fn refresh_on_timer(&self) -> Option<Arc<DashboardView>> {
        let Some(_permit) = self.gate.try_enter() else {
            debug!("Refresh already running, skipping timer tick");
            return None;
        };
        let controls = self.controls().await;
        Some(self.run(controls, "timer").await)
    }

    /// Latest view, computing one first if nothing has been refreshed yet
    pub async fn current(&self) -> Arc<DashboardView> {
        if let Some(view) = self.latest().await {
            return view;
        }
        let controls = self.controls().await;
        self.refresh_with(controls).await
    }

    async fn run(&self, controls: Controls, trigger: &str) -> Arc<DashboardView> {
        let refresh_id = Uuid::new_v4();
        let span = info_span!("refresh", id = %refresh_id, mode = controls.mode.as_str(), trigger);

        let view = async {
            info!("Refreshing {} view for {} days", controls.mode.as_str(), controls.days.get());
            let view = self.service.refresh(&controls).await;
            let table = stats_table(&view.stats);
            if !table.is_empty() {
                info!("Summary statistics:\n{}", table.render());
            }
            view
        }
        .instrument(span)
        .await;

        let view = Arc::new(view);
        *self.latest.write().await = Some(view.clone());
        view
    }
}
