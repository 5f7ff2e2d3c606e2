//! Dashboard view models handed to the page and JSON renderers

use serde::Serialize;

use super::controls::{Controls, DashboardMode};
use super::stats::SummaryStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ViewStatus {
    Ready,
    Unavailable { message: String },
}

/// Sign of a card's change figure, drives the positive/negative styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
    pub change: Option<String>,
    pub trend: Option<Trend>,
    pub accent: String,
}

/// Rendered SVG chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartImage {
    pub title: String,
    pub svg: String,
}

/// Everything one refresh produces
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub controls: Controls,
    pub mode: DashboardMode,
    pub status: ViewStatus,
    pub cards: Vec<StatCard>,
    pub stats: Vec<SummaryStats>,
    pub charts: Vec<ChartImage>,
    pub table_rows: usize,
    pub last_updated: String,
}

impl DashboardView {
    pub fn is_ready(&self) -> bool {
        self.status == ViewStatus::Ready
    }

    pub fn status_message(&self) -> Option<&str> {
        match &self.status {
            ViewStatus::Ready => None,
            ViewStatus::Unavailable { message } => Some(message),
        }
    }
}
