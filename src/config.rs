use std::net::SocketAddr;
use std::time::Duration;

use plotters::style::RGBColor;

use crate::utils::errors::DashboardError;

pub const DEFAULT_BIND: &str = "127.0.0.1:8050";
pub const DEFAULT_COINGECKO_API: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_GEOCODING_API: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_WEATHER_API: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_REFRESH_SECS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_COINS: [&str; 3] = ["bitcoin", "ethereum", "cardano"];
pub const DEFAULT_STOCKS: [&str; 3] = ["AAPL", "GOOGL", "MSFT"];

/// Dark colour scheme shared by the page and the charts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    pub surface: RGBColor,
    pub primary: RGBColor,
    pub secondary: RGBColor,
    pub accent: RGBColor,
    pub text: RGBColor,
    pub text_secondary: RGBColor,
}

impl Palette {
    pub const DEFAULT: Palette = Palette {
        background: RGBColor(0x0f, 0x17, 0x2a),
        surface: RGBColor(0x1e, 0x29, 0x3b),
        primary: RGBColor(0x3b, 0x82, 0xf6),
        secondary: RGBColor(0x8b, 0x5c, 0xf6),
        accent: RGBColor(0x10, 0xb9, 0x81),
        text: RGBColor(0xf1, 0xf5, 0xf9),
        text_secondary: RGBColor(0x94, 0xa3, 0xb8),
    };

    /// Series colours, cycled by series index
    pub fn series(&self) -> [RGBColor; 3] {
        [self.primary, self.secondary, self.accent]
    }

    pub fn series_color(&self, index: usize) -> RGBColor {
        self.series()[index % 3]
    }

    /// CSS hex form, e.g. `#0f172a`
    pub fn hex(color: RGBColor) -> String {
        format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::DEFAULT
    }
}

/// Immutable runtime configuration, injected into every component
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub coingecko_api: String,
    pub geocoding_api: String,
    pub weather_api: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub coins: Vec<String>,
    pub stock_symbols: Vec<String>,
    pub palette: Palette,
}

impl AppConfig {
    /// Load from the environment (after `.env`), falling back to defaults
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("DASHBOARD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| DashboardError::Config(format!("DASHBOARD_BIND '{}': {}", bind, e)))?;

        let refresh_secs = parse_secs(&lookup, "REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_SECS)?;
        let timeout_secs = parse_secs(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        let coins = parse_list(lookup("DASHBOARD_COINS"), &DEFAULT_COINS, |s| s.to_lowercase());
        let stock_symbols = parse_list(lookup("DASHBOARD_STOCKS"), &DEFAULT_STOCKS, |s| s.to_uppercase());

        Ok(Self {
            bind_addr,
            coingecko_api: lookup("COINGECKO_API_URL").unwrap_or_else(|| DEFAULT_COINGECKO_API.to_string()),
            geocoding_api: lookup("GEOCODING_API_URL").unwrap_or_else(|| DEFAULT_GEOCODING_API.to_string()),
            weather_api: lookup("WEATHER_API_URL").unwrap_or_else(|| DEFAULT_WEATHER_API.to_string()),
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            coins,
            stock_symbols,
            palette: Palette::DEFAULT,
        })
    }

    /// Same defaults as `from_env` but with every upstream pointed at `base_url`
    #[cfg(test)]
    pub fn for_upstream(base_url: &str) -> Self {
        let mut config = Self::from_lookup(|_| None).expect("default config is valid");
        config.coingecko_api = base_url.to_string();
        config.geocoding_api = format!("{}/v1/search", base_url);
        config.weather_api = format!("{}/v1/forecast", base_url);
        config.request_timeout = Duration::from_secs(2);
        config
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<u64, DashboardError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| DashboardError::Config(format!("{} '{}': {}", key, raw, e)))?;
            if secs == 0 {
                return Err(DashboardError::Config(format!("{} must be greater than zero", key)));
            }
            Ok(secs)
        }
    }
}

fn parse_list(raw: Option<String>, default: &[&str], normalize: fn(&str) -> String) -> Vec<String> {
    let parsed: Vec<String> = raw
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize)
        .collect();

    if parsed.is_empty() {
        default.iter().map(|s| s.to_string()).collect()
    } else {
        parsed
    }
}
