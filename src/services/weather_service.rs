use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::api::open_meteo::{ForecastResponse, OpenMeteoClient};
use crate::api::ApiError;
use crate::models::{Days, Location, WeatherRow, WeatherTable};
use crate::services::geocode_service;

/// Open-Meteo hourly timestamps, e.g. `2024-01-01T13:00`
const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn parse_hour(raw: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(raw, HOURLY_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| ApiError::DeserializationError(format!("Invalid hourly time '{}': {}", raw, e)))
}

/// Zip the hourly arrays by index into rows tagged with the location name.
/// Arrays of unequal length are truncated to the shortest.
pub fn normalize_forecast(location: &Location, response: &ForecastResponse) -> Result<WeatherTable, ApiError> {
    let hourly = &response.hourly;
    let lengths = [
        hourly.time.len(),
        hourly.temperature_2m.len(),
        hourly.relative_humidity_2m.len(),
        hourly.precipitation.len(),
    ];
    let len = lengths.iter().copied().min().unwrap_or(0);

    if lengths.iter().any(|&l| l != len) {
        warn!(
            "Hourly arrays for {} have mismatched lengths {:?}, truncating to {}",
            location.canonical_name, lengths, len
        );
    }

    let mut rows = Vec::with_capacity(len);
    for i in 0..len {
        rows.push(WeatherRow {
            timestamp: parse_hour(&hourly.time[i])?,
            temperature: hourly.temperature_2m[i].unwrap_or(f64::NAN),
            humidity: hourly.relative_humidity_2m[i].unwrap_or(f64::NAN),
            precipitation: hourly.precipitation[i].unwrap_or(f64::NAN),
            location: location.canonical_name.clone(),
        });
    }

    Ok(WeatherTable::from_rows(rows))
}

/// Resolve `place`, then fetch and normalize its hourly forecast
pub async fn fetch_weather_data(client: &OpenMeteoClient, place: &str, days: Days) -> Result<WeatherTable, ApiError> {
    let location = geocode_service::resolve(client, place).await;

    let response = client
        .get_hourly_forecast(location.latitude, location.longitude, days.get())
        .await?;
    debug!(
        "Forecast for {} in timezone {}",
        location.canonical_name,
        response.timezone.as_deref().unwrap_or("unknown")
    );

    normalize_forecast(&location, &response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::open_meteo::HourlyForecast;
    use crate::test_support::FixtureServer;
    use std::time::Duration;

    fn hourly(len: usize) -> HourlyForecast {
        HourlyForecast {
            time: (0..len).map(|h| format!("2024-03-01T{:02}:00", h)).collect(),
            temperature_2m: (0..len).map(|h| Some(h as f64 * 0.5)).collect(),
            relative_humidity_2m: (0..len).map(|h| Some(50.0 + h as f64)).collect(),
            precipitation: (0..len).map(|h| Some(h as f64 / 10.0)).collect(),
        }
    }

    fn response(hourly: HourlyForecast) -> ForecastResponse {
        ForecastResponse {
            timezone: Some("Europe/London".to_string()),
            hourly,
        }
    }

    #[test]
    fn test_zips_24_hours_by_index() {
        let table = normalize_forecast(&Location::fallback(), &response(hourly(24))).unwrap();

        assert_eq!(table.len(), 24);
        for (h, row) in table.rows().iter().enumerate() {
            assert_eq!(row.timestamp.format("%H").to_string(), format!("{:02}", h));
            assert_eq!(row.temperature, h as f64 * 0.5);
            assert_eq!(row.humidity, 50.0 + h as f64);
            assert_eq!(row.precipitation, h as f64 / 10.0);
            assert_eq!(row.location, "New York");
        }
    }

    #[test]
    fn test_mismatched_lengths_truncate_to_shortest() {
        let mut data = hourly(24);
        data.precipitation.truncate(20);
        data.time.push("2024-03-02T00:00".to_string());

        let table = normalize_forecast(&Location::fallback(), &response(data)).unwrap();
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn test_null_values_become_nan() {
        let mut data = hourly(2);
        data.temperature_2m[1] = None;

        let table = normalize_forecast(&Location::fallback(), &response(data)).unwrap();
        assert!(table.rows()[1].temperature.is_nan());
        assert_eq!(table.rows()[1].humidity, 51.0);
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let mut data = hourly(2);
        data.time[0] = "yesterday".to_string();

        let err = normalize_forecast(&Location::fallback(), &response(data)).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[tokio::test]
    async fn test_fetch_uses_resolved_location() {
        let forecast = serde_json::json!({
            "latitude": 35.7,
            "longitude": 139.69,
            "timezone": "Asia/Tokyo",
            "hourly": {
                "time": ["2024-03-01T00:00", "2024-03-01T01:00", "2024-03-01T02:00"],
                "temperature_2m": [8.1, 7.9, null],
                "relative_humidity_2m": [60, 62, 64],
                "precipitation": [0.0, 0.2, 0.0]
            }
        })
        .to_string();
        let server = FixtureServer::start(&[
            (
                "/v1/search",
                200,
                r#"{"results":[{"name":"Tokyo","latitude":35.6895,"longitude":139.69171}]}"#,
            ),
            ("/v1/forecast", 200, forecast.as_str()),
        ])
        .await;
        let base = server.base_url();
        let client = OpenMeteoClient::new(
            &format!("{}/v1/search", base),
            &format!("{}/v1/forecast", base),
            Duration::from_secs(2),
        )
        .unwrap();

        let table = fetch_weather_data(&client, "tokyo", Days::new(3).unwrap()).await.unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.location(), Some("Tokyo"));
        assert_eq!(table.rows()[1].humidity, 62.0);

        let requests = server.requests();
        let forecast_request = requests.iter().find(|r| r.starts_with("/v1/forecast")).unwrap();
        assert!(forecast_request.contains("latitude=35.6895"));
        assert!(forecast_request.contains("forecast_days=3"));
        assert!(forecast_request.contains("timezone=auto"));
    }

    #[tokio::test]
    async fn test_forecast_failure_is_an_error() {
        let server = FixtureServer::start(&[
            ("/v1/search", 200, r#"{"results":[]}"#),
            ("/v1/forecast", 400, r#"{"error":true,"reason":"bad"}"#),
        ])
        .await;
        let base = server.base_url();
        let client = OpenMeteoClient::new(
            &format!("{}/v1/search", base),
            &format!("{}/v1/forecast", base),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = fetch_weather_data(&client, "nowhere", Days::new(1).unwrap()).await.unwrap_err();
        assert!(matches!(err, ApiError::HttpError(400, _)));

        // fallback coordinates were used for the forecast
        let requests = server.requests();
        assert!(requests.iter().any(|r| r.contains("latitude=40.7128")));
    }
}
