//! Summary statistics models

use serde::Serialize;

/// Per-series summary recomputed on every refresh
///
/// `last_step_change_pct` compares the final two points and is what the stat
/// cards show. `total_change_pct` compares the last point against the first
/// and feeds the "Total Change (%)" chart. Both are kept on purpose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub series_label: String,
    pub latest_value: f64,
    pub last_step_change_pct: Option<f64>,
    pub total_change_pct: Option<f64>,
    pub mean: Option<f64>,
    pub sum: Option<f64>,
}
