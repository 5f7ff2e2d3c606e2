use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::api::{ApiError, CoinGeckoClient, OpenMeteoClient};
use crate::config::{AppConfig, Palette};
use crate::models::{
    ChartImage, Controls, DashboardMode, DashboardView, SeriesTable, StatCard, SummaryStats, Trend, ViewStatus,
    WeatherMetric, WeatherTable,
};
use crate::services::chart_service::{self, HALF_SIZE, MAIN_SIZE};
use crate::services::stock_service::MockStockGenerator;
use crate::services::{crypto_service, stats_service, weather_service};
use crate::utils::errors::DashboardError;

pub const NO_CRYPTO_DATA: &str = "No crypto data available";
pub const NO_WEATHER_DATA: &str = "No weather data available";
pub const NO_STOCK_DATA: &str = "No stock data available";

/// Wall-clock stamp shown as "Last updated"
pub fn last_updated_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `$1,234.56`
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let formatted = format!("{:.2}", value.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

fn format_optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, unit),
        None => "n/a".to_string(),
    }
}

/// Runs the pipeline for the selected mode and assembles the view
pub struct DashboardService {
    config: Arc<AppConfig>,
    coingecko: CoinGeckoClient,
    open_meteo: OpenMeteoClient,
    stocks: MockStockGenerator,
}

impl DashboardService {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, ApiError> {
        let coingecko = CoinGeckoClient::new(&config.coingecko_api, config.request_timeout)?;
        let open_meteo = OpenMeteoClient::new(&config.geocoding_api, &config.weather_api, config.request_timeout)?;
        Ok(Self {
            config,
            coingecko,
            open_meteo,
            stocks: MockStockGenerator::new(),
        })
    }

    /// Replace the (entropy-seeded) stock generator, e.g. with a seeded one
    pub fn with_stock_generator(mut self, stocks: MockStockGenerator) -> Self {
        self.stocks = stocks;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    /// Re-run the active pipeline for `controls`. Never fails: upstream
    /// problems end up as an unavailable view.
    pub async fn refresh(&self, controls: &Controls) -> DashboardView {
        match controls.mode {
            DashboardMode::Crypto => self.crypto_view(controls).await,
            DashboardMode::Weather => self.weather_view(controls).await,
            DashboardMode::Stocks => self.stocks_view(controls),
        }
    }

    async fn crypto_view(&self, controls: &Controls) -> DashboardView {
        let batch = crypto_service::fetch_crypto_data(&self.coingecko, &self.config.coins, controls.days).await;
        if !batch.failures.is_empty() {
            let failed: Vec<String> = batch
                .failures
                .iter()
                .map(|f| format!("{} ({})", f.coin_id, f.error))
                .collect();
            warn!("{} of {} coins failed: {}", failed.len(), self.config.coins.len(), failed.join(", "));
        }

        if batch.table.is_empty() {
            return self.unavailable_view(controls, NO_CRYPTO_DATA);
        }
        self.price_view(controls, &batch.table, "Cryptocurrency")
    }

    fn stocks_view(&self, controls: &Controls) -> DashboardView {
        let table = self.stocks.generate(&self.config.stock_symbols, controls.days);
        if table.is_empty() {
            return self.unavailable_view(controls, NO_STOCK_DATA);
        }
        self.price_view(controls, &table, "Stock")
    }

    async fn weather_view(&self, controls: &Controls) -> DashboardView {
        let place = controls.effective_location();
        match weather_service::fetch_weather_data(&self.open_meteo, place, controls.days).await {
            Ok(table) if !table.is_empty() => self.forecast_view(controls, &table),
            Ok(_) => {
                warn!("Forecast for '{}' contained no hourly rows", place);
                self.unavailable_view(controls, NO_WEATHER_DATA)
            }
            Err(e) => {
                warn!("Error fetching weather for '{}': {}", place, e);
                self.unavailable_view(controls, NO_WEATHER_DATA)
            }
        }
    }

    /// Crypto and stocks share one layout: per-series cards, a line chart,
    /// an area chart and a total-change bar chart
    fn price_view(&self, controls: &Controls, table: &SeriesTable, kind: &str) -> DashboardView {
        let palette = self.palette();
        let days = controls.days.get();
        let stats = stats_service::summarize(table);

        let cards = stats
            .iter()
            .enumerate()
            .map(|(i, s)| StatCard {
                title: s.series_label.clone(),
                value: format_usd(s.latest_value),
                subtitle: None,
                change: s.last_step_change_pct.map(|c| format!("{:+.2}%", c)),
                trend: s
                    .last_step_change_pct
                    .map(|c| if c > 0.0 { Trend::Positive } else { Trend::Negative }),
                accent: Palette::hex(palette.series_color(i)),
            })
            .collect();

        let total_changes: Vec<(String, f64)> = stats
            .iter()
            .filter_map(|s| s.total_change_pct.map(|c| (s.series_label.clone(), c)))
            .collect();

        let main_title = format!("{} Prices - Last {} Days", kind, days);
        let charts = vec![
            self.chart(
                &main_title,
                MAIN_SIZE,
                chart_service::line_chart(table, &main_title, "Price (USD)", palette),
            ),
            self.chart(
                "Price Distribution",
                HALF_SIZE,
                chart_service::area_chart(table, "Price Distribution", "Price (USD)", palette),
            ),
            self.chart(
                "Total Change (%)",
                HALF_SIZE,
                chart_service::category_bar_chart(&total_changes, "Total Change (%)", "Change (%)", palette),
            ),
        ];

        self.ready_view(controls, cards, stats, charts, table.len())
    }

    fn forecast_view(&self, controls: &Controls, table: &WeatherTable) -> DashboardView {
        let palette = self.palette();
        let days = controls.days.get();
        let location = table.location().unwrap_or(controls.effective_location()).to_string();

        let temperature = table.metric(WeatherMetric::Temperature);
        let humidity = table.metric(WeatherMetric::Humidity);
        let precipitation = table.metric(WeatherMetric::Precipitation);

        // one summary per metric, labelled "{location} {metric}"
        let metric_stats = |series: &SeriesTable, metric: WeatherMetric, with_mean: bool, with_sum: bool| {
            stats_service::summarize_aggregate(series, with_mean, with_sum).map(|s| SummaryStats {
                series_label: format!("{} {}", location, metric.name()),
                ..s
            })
        };
        let temperature_stats = metric_stats(&temperature, WeatherMetric::Temperature, true, false);
        let humidity_stats = metric_stats(&humidity, WeatherMetric::Humidity, true, false);
        let precipitation_stats = metric_stats(&precipitation, WeatherMetric::Precipitation, false, true);

        let next_days = format!("Next {} days", days);
        let cards = vec![
            StatCard {
                title: "Avg Temperature".to_string(),
                value: format_optional(temperature_stats.as_ref().and_then(|s| s.mean), "°C"),
                subtitle: Some(location.clone()),
                change: None,
                trend: None,
                accent: Palette::hex(palette.primary),
            },
            StatCard {
                title: "Avg Humidity".to_string(),
                value: format_optional(humidity_stats.as_ref().and_then(|s| s.mean), "%"),
                subtitle: Some(next_days.clone()),
                change: None,
                trend: None,
                accent: Palette::hex(palette.secondary),
            },
            StatCard {
                title: "Total Precipitation".to_string(),
                value: format_optional(precipitation_stats.as_ref().and_then(|s| s.sum), "mm"),
                subtitle: Some(next_days),
                change: None,
                trend: None,
                accent: Palette::hex(palette.accent),
            },
        ];

        let stats: Vec<SummaryStats> = [temperature_stats, humidity_stats, precipitation_stats]
            .into_iter()
            .flatten()
            .collect();

        let main_title = format!("Temperature Forecast - {} ({} Days)", location, days);
        let charts = vec![
            self.chart(
                &main_title,
                MAIN_SIZE,
                chart_service::line_chart(&temperature, &main_title, "Temperature (°C)", palette),
            ),
            self.chart(
                "Humidity Levels",
                HALF_SIZE,
                chart_service::area_chart(&humidity, "Humidity Levels", "Humidity (%)", palette),
            ),
            self.chart(
                "Precipitation",
                HALF_SIZE,
                chart_service::time_bar_chart(&precipitation, "Precipitation", "Precipitation (mm)", palette),
            ),
        ];

        self.ready_view(controls, cards, stats, charts, table.len())
    }

    /// Keep a rendered chart, or swap in a placeholder when rendering failed
    fn chart(&self, title: &str, size: (u32, u32), rendered: Result<String, DashboardError>) -> ChartImage {
        let svg = rendered.unwrap_or_else(|e| {
            warn!("Chart '{}' could not be rendered: {}", title, e);
            self.placeholder_svg("Chart unavailable", size)
        });
        ChartImage {
            title: title.to_string(),
            svg,
        }
    }

    fn placeholder_svg(&self, message: &str, size: (u32, u32)) -> String {
        chart_service::placeholder_chart(message, size, self.palette()).unwrap_or_else(|e| {
            warn!("Placeholder chart could not be rendered: {}", e);
            String::new()
        })
    }

    fn ready_view(
        &self,
        controls: &Controls,
        cards: Vec<StatCard>,
        stats: Vec<SummaryStats>,
        charts: Vec<ChartImage>,
        table_rows: usize,
    ) -> DashboardView {
        info!(
            "{} view ready: {} rows, {} series",
            controls.mode.as_str(),
            table_rows,
            stats.len()
        );
        DashboardView {
            controls: controls.clone(),
            mode: controls.mode,
            status: ViewStatus::Ready,
            cards,
            stats,
            charts,
            table_rows,
            last_updated: last_updated_stamp(),
        }
    }

    /// Placeholder view: no statistics are computed
    fn unavailable_view(&self, controls: &Controls, message: &str) -> DashboardView {
        warn!("{} view unavailable: {}", controls.mode.as_str(), message);
        let charts = [MAIN_SIZE, HALF_SIZE, HALF_SIZE]
            .into_iter()
            .map(|size| ChartImage {
                title: message.to_string(),
                svg: self.placeholder_svg(message, size),
            })
            .collect();

        DashboardView {
            controls: controls.clone(),
            mode: controls.mode,
            status: ViewStatus::Unavailable {
                message: message.to_string(),
            },
            cards: Vec::new(),
            stats: Vec::new(),
            charts,
            table_rows: 0,
            last_updated: last_updated_stamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Days;
    use crate::test_support::{unreachable_base_url, FixtureServer};

    const BITCOIN: &str = r#"{"prices":[[1700000000000,37000.5],[1700003600000,37100.0],[1700007200000,36950.25]]}"#;

    fn controls(mode: DashboardMode, days: i64, location: &str) -> Controls {
        Controls {
            mode,
            days: Days::new(days).unwrap(),
            location: location.to_string(),
        }
    }

    fn service(base_url: &str) -> DashboardService {
        DashboardService::new(Arc::new(AppConfig::for_upstream(base_url))).unwrap()
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.5), "$0.50");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(36950.25), "$36,950.25");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-42.0), "-$42.00");
        assert_eq!(format_usd(f64::NAN), "n/a");
    }

    #[tokio::test]
    async fn test_crypto_all_failed_shows_placeholder() {
        let view = service(&unreachable_base_url())
            .refresh(&controls(DashboardMode::Crypto, 7, ""))
            .await;

        assert_eq!(
            view.status,
            ViewStatus::Unavailable {
                message: NO_CRYPTO_DATA.to_string()
            }
        );
        assert!(view.cards.is_empty());
        assert!(view.stats.is_empty());
        assert_eq!(view.table_rows, 0);
        assert_eq!(view.charts.len(), 3);
        assert!(view.charts.iter().all(|c| c.svg.contains(NO_CRYPTO_DATA)));
        assert_eq!(view.last_updated.len(), "2024-01-01 00:00:00".len());
    }

    #[tokio::test]
    async fn test_crypto_partial_success_renders_cards() {
        let server = FixtureServer::start(&[("/coins/bitcoin/market_chart", 200, BITCOIN)]).await;

        let view = service(&server.base_url())
            .refresh(&controls(DashboardMode::Crypto, 1, ""))
            .await;

        assert!(view.is_ready());
        assert_eq!(view.table_rows, 3);
        assert_eq!(view.cards.len(), 1);

        let card = &view.cards[0];
        assert_eq!(card.title, "Bitcoin");
        assert_eq!(card.value, "$36,950.25");
        assert_eq!(card.change.as_deref(), Some("-0.40%"));
        assert_eq!(card.trend, Some(Trend::Negative));
        assert_eq!(card.accent, "#3b82f6");

        let total = view.stats[0].total_change_pct.unwrap();
        assert!((total - (36950.25 - 37000.5) / 37000.5 * 100.0).abs() < 1e-9);
        assert_eq!(view.charts[0].title, "Cryptocurrency Prices - Last 1 Days");
    }

    #[tokio::test]
    async fn test_weather_view_cards() {
        let forecast = serde_json::json!({
            "timezone": "Europe/London",
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00"],
                "temperature_2m": [10.0, 12.0],
                "relative_humidity_2m": [70, 80],
                "precipitation": [0.2, 0.3]
            }
        })
        .to_string();
        let server = FixtureServer::start(&[
            (
                "/v1/search",
                200,
                r#"{"results":[{"name":"London","latitude":51.50853,"longitude":-0.12574}]}"#,
            ),
            ("/v1/forecast", 200, forecast.as_str()),
        ])
        .await;

        let view = service(&server.base_url())
            .refresh(&controls(DashboardMode::Weather, 2, "london"))
            .await;

        assert!(view.is_ready());
        assert_eq!(view.table_rows, 2);
        assert_eq!(view.cards[0].value, "11.0°C");
        assert_eq!(view.cards[0].subtitle.as_deref(), Some("London"));
        assert_eq!(view.cards[1].value, "75.0%");
        assert_eq!(view.cards[2].value, "0.5mm");
        assert_eq!(view.cards[2].subtitle.as_deref(), Some("Next 2 days"));
        assert_eq!(view.charts[0].title, "Temperature Forecast - London (2 Days)");
        assert_eq!(view.stats.len(), 3);
    }

    #[tokio::test]
    async fn test_weather_stats_name_their_metric() {
        let forecast = serde_json::json!({
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00", "2024-03-01T02:00"],
                "temperature_2m": [4.0, null, 6.0],
                "relative_humidity_2m": [90, 85, 80],
                "precipitation": [1.0, 0.0, 0.5]
            }
        })
        .to_string();
        let server = FixtureServer::start(&[
            (
                "/v1/search",
                200,
                r#"{"results":[{"name":"Oslo","latitude":59.91,"longitude":10.75}]}"#,
            ),
            ("/v1/forecast", 200, forecast.as_str()),
        ])
        .await;

        let view = service(&server.base_url())
            .refresh(&controls(DashboardMode::Weather, 1, "oslo"))
            .await;

        let labels: Vec<&str> = view.stats.iter().map(|s| s.series_label.as_str()).collect();
        assert_eq!(labels, vec!["Oslo Temperature", "Oslo Humidity", "Oslo Precipitation"]);

        // cards show the same figures the stats carry
        assert_eq!(view.stats[0].mean, Some(5.0));
        assert_eq!(view.cards[0].value, "5.0°C");
        assert_eq!(view.stats[1].mean, Some(85.0));
        assert_eq!(view.cards[1].value, "85.0%");
        assert_eq!(view.stats[2].sum, Some(1.5));
        assert_eq!(view.stats[2].mean, None);
        assert_eq!(view.cards[2].value, "1.5mm");
    }

    #[tokio::test]
    async fn test_weather_blank_location_queries_fallback_city() {
        let server = FixtureServer::start(&[("/v1/forecast", 500, "down")]).await;

        let view = service(&server.base_url())
            .refresh(&controls(DashboardMode::Weather, 3, "  "))
            .await;

        assert!(!view.is_ready());
        assert!(view.cards.is_empty());
        let requests = server.requests();
        assert!(requests.iter().any(|r| r.contains("name=New+York") || r.contains("name=New%20York")));
    }

    #[tokio::test]
    async fn test_stocks_view_is_reproducible_with_seed() {
        let base = unreachable_base_url();
        let request = controls(DashboardMode::Stocks, 30, "");

        let a = service(&base)
            .with_stock_generator(MockStockGenerator::with_seed(3))
            .refresh(&request)
            .await;
        let b = service(&base)
            .with_stock_generator(MockStockGenerator::with_seed(3))
            .refresh(&request)
            .await;

        assert!(a.is_ready());
        assert_eq!(a.table_rows, 90);
        assert_eq!(
            a.cards.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
            vec!["AAPL", "GOOGL", "MSFT"]
        );
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.charts[0].title, "Stock Prices - Last 30 Days");
    }
}
