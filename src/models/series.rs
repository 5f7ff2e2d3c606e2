//! Uniform tabular schema shared by every normalizer
//!
//! A [`SeriesTable`] is the `{x, y, series}` shape that chart rendering
//! consumes. Rows are stored series-by-series in upstream order and are never
//! re-sorted.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A single `(timestamp, value)` sample tagged with its series label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesRow {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub series_label: String,
}

impl TimeSeriesRow {
    pub fn new(timestamp: NaiveDateTime, value: f64, series_label: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            series_label: series_label.into(),
        }
    }
}

/// Ordered, read-only collection of rows produced by one pipeline invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesTable {
    rows: Vec<TimeSeriesRow>,
}

impl SeriesTable {
    /// An explicitly empty table ("no data")
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<TimeSeriesRow>) -> Self {
        Self { rows }
    }

    /// Concatenate per-series tables, keeping the given order
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = SeriesTable>,
    {
        let rows = tables.into_iter().flat_map(|t| t.rows).collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TimeSeriesRow] {
        &self.rows
    }

    /// Unique series labels in order of first appearance
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !labels.contains(&row.series_label.as_str()) {
                labels.push(&row.series_label);
            }
        }
        labels
    }

    /// Rows belonging to one series, in stored order
    pub fn series<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a TimeSeriesRow> + 'a {
        self.rows.iter().filter(move |r| r.series_label == label)
    }

    pub fn values_for(&self, label: &str) -> Vec<f64> {
        self.series(label).map(|r| r.value).collect()
    }
}
