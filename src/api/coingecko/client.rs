use std::time::Duration;

use reqwest::Client as HttpClient;

use super::models::MarketChartResponse;
use crate::api::error::ApiError;
use crate::api::http::{build_http_client, get_json};

/// CoinGecko public API client (unauthenticated)
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http_client: HttpClient,
    base_url: String,
}

impl CoinGeckoClient {
    /// Create a client against `base_url`, e.g. `https://api.coingecko.com/api/v3`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET /coins/{coin_id}/market_chart
    ///
    /// # Arguments
    /// * `coin_id` - CoinGecko coin id, e.g. `bitcoin`
    /// * `vs_currency` - Quote currency, e.g. `usd`
    /// * `days` - Days of history to return
    pub async fn get_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<MarketChartResponse, ApiError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let query = [("vs_currency", vs_currency.to_string()), ("days", days.to_string())];

        get_json(&self.http_client, &url, &query).await
    }
}
