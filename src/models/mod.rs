//! Data models for the dashboard pipelines
//!
//! The normalizers produce [`SeriesTable`]s (or a [`WeatherTable`] for the
//! zipped hourly forecast); the aggregator turns them into a [`DashboardView`].

pub mod controls;
pub mod dashboard;
pub mod location;
pub mod series;
pub mod stats;
pub mod weather;

pub use controls::{Controls, DashboardMode, Days, MAX_DAYS, MIN_DAYS};
pub use dashboard::{ChartImage, DashboardView, StatCard, Trend, ViewStatus};
pub use location::Location;
pub use series::{SeriesTable, TimeSeriesRow};
pub use stats::SummaryStats;
pub use weather::{WeatherMetric, WeatherRow, WeatherTable};
