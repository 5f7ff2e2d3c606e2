pub mod client;
pub mod models;

pub use client::OpenMeteoClient;
pub use models::{ForecastResponse, GeocodingResponse, GeocodingResult, HourlyForecast};
