use std::time::Duration;

use reqwest::Client as HttpClient;

use super::models::{ForecastResponse, GeocodingResponse};
use crate::api::error::ApiError;
use crate::api::http::{build_http_client, get_json};

/// Hourly variables requested from the forecast endpoint
pub const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation";

/// Open-Meteo geocoding and forecast client (unauthenticated)
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http_client: HttpClient,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(geocoding_url: &str, forecast_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            geocoding_url: geocoding_url.to_string(),
            forecast_url: forecast_url.to_string(),
        })
    }

    /// GET /v1/search
    ///
    /// # Arguments
    /// * `name` - Free-text place name
    /// * `count` - Maximum number of results
    pub async fn search_location(&self, name: &str, count: u32) -> Result<GeocodingResponse, ApiError> {
        let query = [
            ("name", name.to_string()),
            ("count", count.to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];

        get_json(&self.http_client, &self.geocoding_url, &query).await
    }

    /// GET /v1/forecast with hourly temperature, humidity and precipitation
    ///
    /// The timezone is left for the service to detect from the coordinates,
    /// so `hourly.time` is local wall time at the location.
    pub async fn get_hourly_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        forecast_days: u32,
    ) -> Result<ForecastResponse, ApiError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("forecast_days", forecast_days.to_string()),
            ("timezone", "auto".to_string()),
        ];

        get_json(&self.http_client, &self.forecast_url, &query).await
    }
}
