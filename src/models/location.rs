//! Resolved place for weather lookups

use serde::Serialize;

pub const FALLBACK_LATITUDE: f64 = 40.7128;
pub const FALLBACK_LONGITUDE: f64 = -74.0060;
pub const FALLBACK_NAME: &str = "New York";

/// Coordinates plus the canonical place name reported by the geocoder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub canonical_name: String,
}

impl Location {
    /// Location used whenever a place name cannot be resolved
    pub fn fallback() -> Self {
        Self {
            latitude: FALLBACK_LATITUDE,
            longitude: FALLBACK_LONGITUDE,
            canonical_name: FALLBACK_NAME.to_string(),
        }
    }
}
