//! Hourly weather rows zipped from the forecast's parallel arrays

use chrono::NaiveDateTime;
use serde::Serialize;

use super::series::{SeriesTable, TimeSeriesRow};

/// One hourly forecast slot. Missing upstream values are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRow {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherMetric {
    Temperature,
    Humidity,
    Precipitation,
}

impl WeatherMetric {
    pub fn name(&self) -> &'static str {
        match self {
            WeatherMetric::Temperature => "Temperature",
            WeatherMetric::Humidity => "Humidity",
            WeatherMetric::Precipitation => "Precipitation",
        }
    }

    fn pick(self, row: &WeatherRow) -> f64 {
        match self {
            WeatherMetric::Temperature => row.temperature,
            WeatherMetric::Humidity => row.humidity,
            WeatherMetric::Precipitation => row.precipitation,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherTable {
    rows: Vec<WeatherRow>,
}

impl WeatherTable {
    pub fn from_rows(rows: Vec<WeatherRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[WeatherRow] {
        &self.rows
    }

    /// Canonical location name the rows were tagged with
    pub fn location(&self) -> Option<&str> {
        self.rows.first().map(|r| r.location.as_str())
    }

    /// Project one metric into the uniform schema, labelled by location
    pub fn metric(&self, metric: WeatherMetric) -> SeriesTable {
        SeriesTable::from_rows(
            self.rows
                .iter()
                .map(|r| TimeSeriesRow::new(r.timestamp, metric.pick(r), r.location.clone()))
                .collect(),
        )
    }
}
