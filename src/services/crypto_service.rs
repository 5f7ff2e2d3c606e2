use chrono::{DateTime, NaiveDateTime};
use tracing::{debug, warn};

use crate::api::coingecko::{CoinGeckoClient, MarketChartResponse};
use crate::api::ApiError;
use crate::models::{Days, SeriesTable, TimeSeriesRow};

/// Quote currency for every price series
pub const VS_CURRENCY: &str = "usd";

/// A coin that contributed no rows, and why
#[derive(Debug, Clone)]
pub struct CoinFailure {
    pub coin_id: String,
    pub error: ApiError,
}

/// Rows for every coin that succeeded plus the ones that did not
#[derive(Debug, Clone, Default)]
pub struct CryptoBatch {
    pub table: SeriesTable,
    pub failures: Vec<CoinFailure>,
}

/// Upper-case the first character and lower-case the rest ("bitcoin" -> "Bitcoin")
pub fn capitalize(coin_id: &str) -> String {
    let mut chars = coin_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Convert epoch milliseconds into a UTC wall-clock instant
pub fn millis_to_datetime(epoch_ms: f64) -> Result<NaiveDateTime, ApiError> {
    if !epoch_ms.is_finite() {
        return Err(ApiError::DeserializationError(format!("Invalid timestamp: {}", epoch_ms)));
    }
    DateTime::from_timestamp_millis(epoch_ms as i64)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| ApiError::DeserializationError(format!("Timestamp out of range: {}", epoch_ms)))
}

/// Turn a market-chart payload into rows labelled with the capitalized coin name
pub fn normalize_market_chart(coin_id: &str, response: &MarketChartResponse) -> Result<SeriesTable, ApiError> {
    let label = capitalize(coin_id);
    let rows = response
        .prices
        .iter()
        .map(|&(epoch_ms, price)| Ok(TimeSeriesRow::new(millis_to_datetime(epoch_ms)?, price, label.clone())))
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(SeriesTable::from_rows(rows))
}

/// Fetch and normalize one coin's price history
pub async fn fetch_coin(client: &CoinGeckoClient, coin_id: &str, days: Days) -> Result<SeriesTable, ApiError> {
    let response = client.get_market_chart(coin_id, VS_CURRENCY, days.get()).await?;
    normalize_market_chart(coin_id, &response)
}

/// Fetch every coin in order. A failing coin is logged and skipped; if all
/// coins fail the batch table is empty.
pub async fn fetch_crypto_data(client: &CoinGeckoClient, coins: &[String], days: Days) -> CryptoBatch {
    let mut tables = Vec::with_capacity(coins.len());
    let mut failures = Vec::new();

    for coin_id in coins {
        match fetch_coin(client, coin_id, days).await {
            Ok(table) => {
                debug!("Fetched {} price points for {}", table.len(), coin_id);
                tables.push(table);
            }
            Err(e) => {
                warn!("Error fetching {}: {}", coin_id, e);
                failures.push(CoinFailure {
                    coin_id: coin_id.clone(),
                    error: e,
                });
            }
        }
    }

    CryptoBatch {
        table: SeriesTable::concat(tables),
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{unreachable_base_url, FixtureServer};
    use std::time::Duration;

    const BITCOIN: &str = r#"{"prices":[[1700000000000,37000.5],[1700003600000,37100.0],[1700007200000,36950.25]],"market_caps":[],"total_volumes":[]}"#;
    const CARDANO: &str = r#"{"prices":[[1700000000000,0.37],[1700003600000,0.38]]}"#;

    fn coins(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn client(base_url: &str) -> CoinGeckoClient {
        CoinGeckoClient::new(base_url, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("bitcoin"), "Bitcoin");
        assert_eq!(capitalize("ETHEREUM"), "Ethereum");
        assert_eq!(capitalize("usd-coin"), "Usd-coin");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_millis_conversion() {
        let ts = millis_to_datetime(1_700_000_000_000.0).unwrap();
        assert_eq!(ts.to_string(), "2023-11-14 22:13:20");
        assert!(millis_to_datetime(f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_row_count_matches_upstream() {
        for days in 1..=30u32 {
            let prices: Vec<(f64, f64)> = (0..days * 24)
                .map(|i| (1_700_000_000_000.0 + i as f64 * 3_600_000.0, 100.0 + i as f64))
                .collect();
            let response = MarketChartResponse { prices };

            let table = normalize_market_chart("ethereum", &response).unwrap();

            assert_eq!(table.len(), (days * 24) as usize);
            assert!(table.rows().iter().all(|r| r.series_label == "Ethereum"));
        }
    }

    #[tokio::test]
    async fn test_fetch_concatenates_in_coin_order() {
        let server = FixtureServer::start(&[
            ("/coins/bitcoin/market_chart", 200, BITCOIN),
            ("/coins/cardano/market_chart", 200, CARDANO),
        ])
        .await;

        let batch = fetch_crypto_data(
            &client(&server.base_url()),
            &coins(&["cardano", "bitcoin"]),
            Days::new(7).unwrap(),
        )
        .await;

        assert!(batch.failures.is_empty());
        assert_eq!(batch.table.len(), 5);
        assert_eq!(batch.table.labels(), vec!["Cardano", "Bitcoin"]);
        assert_eq!(batch.table.values_for("Bitcoin"), vec![37000.5, 37100.0, 36950.25]);
        assert_eq!(batch.table.rows()[0].timestamp.to_string(), "2023-11-14 22:13:20");

        let requests = server.requests();
        assert!(requests[0].contains("vs_currency=usd"));
        assert!(requests[0].contains("days=7"));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_coins() {
        let server = FixtureServer::start(&[
            ("/coins/bitcoin/market_chart", 200, BITCOIN),
            ("/coins/ethereum/market_chart", 500, "upstream exploded"),
            ("/coins/cardano/market_chart", 200, r#"{"unexpected":true}"#),
        ])
        .await;

        let batch = fetch_crypto_data(
            &client(&server.base_url()),
            &coins(&["bitcoin", "ethereum", "cardano"]),
            Days::new(1).unwrap(),
        )
        .await;

        assert_eq!(batch.table.labels(), vec!["Bitcoin"]);
        assert_eq!(batch.failures.len(), 2);
        assert!(matches!(batch.failures[0].error, ApiError::ServerError(500, _)));
        assert!(matches!(batch.failures[1].error, ApiError::DeserializationError(_)));
    }

    #[tokio::test]
    async fn test_all_coins_failing_yields_empty_table() {
        let batch = fetch_crypto_data(
            &client(&unreachable_base_url()),
            &coins(&["bitcoin", "ethereum", "cardano"]),
            Days::new(7).unwrap(),
        )
        .await;

        assert!(batch.table.is_empty());
        assert_eq!(batch.failures.len(), 3);
        assert!(batch
            .failures
            .iter()
            .all(|f| matches!(f.error, ApiError::RequestError(_))));
    }
}
