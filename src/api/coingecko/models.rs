use serde::Deserialize;

/// Response from GET /coins/{id}/market_chart
///
/// Only `prices` is used; `market_caps` and `total_volumes` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    /// `[epoch_ms, price]` pairs in chronological order
    pub prices: Vec<(f64, f64)>,
}
