//! User-selectable dashboard controls

use serde::Serialize;

use crate::models::location::FALLBACK_NAME;
use crate::utils::errors::DashboardError;

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 30;
pub const DEFAULT_DAYS: u32 = 7;

/// Which normalizer pipeline is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardMode {
    #[default]
    Crypto,
    Weather,
    Stocks,
}

impl DashboardMode {
    pub const ALL: [DashboardMode; 3] = [
        DashboardMode::Crypto,
        DashboardMode::Weather,
        DashboardMode::Stocks,
    ];

    /// Parse a selector value; anything unrecognised selects stocks
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "crypto" => DashboardMode::Crypto,
            "weather" => DashboardMode::Weather,
            _ => DashboardMode::Stocks,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardMode::Crypto => "crypto",
            DashboardMode::Weather => "weather",
            DashboardMode::Stocks => "stocks",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DashboardMode::Crypto => "₿ Cryptocurrency Prices",
            DashboardMode::Weather => "🌤️ Weather Forecast",
            DashboardMode::Stocks => "📈 Stock Prices",
        }
    }
}

/// Validated day count in `1..=30`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Days(u32);

impl Days {
    pub fn new(days: i64) -> Result<Self, DashboardError> {
        if days < MIN_DAYS as i64 || days > MAX_DAYS as i64 {
            return Err(DashboardError::InvalidDays(days));
        }
        Ok(Days(days as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Days {
    fn default() -> Self {
        Days(DEFAULT_DAYS)
    }
}

/// The user's current selection, re-applied on every refresh trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controls {
    pub mode: DashboardMode,
    pub days: Days,
    pub location: String,
}

impl Controls {
    /// Location text for the weather pipeline; blank input means the fallback city
    pub fn effective_location(&self) -> &str {
        let trimmed = self.location.trim();
        if trimmed.is_empty() {
            FALLBACK_NAME
        } else {
            trimmed
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            mode: DashboardMode::default(),
            days: Days::default(),
            location: FALLBACK_NAME.to_string(),
        }
    }
}
