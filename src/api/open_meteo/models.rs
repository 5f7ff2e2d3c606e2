use serde::Deserialize;

/// Response from the geocoding search endpoint
///
/// Open-Meteo omits `results` entirely when nothing matches.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Vec<GeocodingResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
}

/// Response from the forecast endpoint (hourly variables only)
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    pub hourly: HourlyForecast,
}

/// Parallel hourly arrays; values may be `null`
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyForecast {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
}
