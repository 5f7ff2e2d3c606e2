use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use serde::Serialize;

lazy_static! {
    static ref STARTED_AT: Instant = Instant::now();
}

#[derive(Debug, Serialize)]
pub struct HealthMetrics {
    pub status: &'static str,
    pub uptime: String,
    pub uptime_secs: u64,
    pub last_updated: Option<String>,
}

/// Pin the start instant; call once at startup
pub fn mark_started() {
    lazy_static::initialize(&STARTED_AT);
}

pub fn format_uptime(elapsed: Duration) -> String {
    let hours = elapsed.as_secs() / 3600;
    let minutes = (elapsed.as_secs() % 3600) / 60;
    let seconds = elapsed.as_secs() % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

pub fn get_health_metrics(last_updated: Option<String>) -> HealthMetrics {
    let elapsed = STARTED_AT.elapsed();
    HealthMetrics {
        status: "ok",
        uptime: format_uptime(elapsed),
        uptime_secs: elapsed.as_secs(),
        last_updated,
    }
}
