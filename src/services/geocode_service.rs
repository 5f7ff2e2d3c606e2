use tracing::{debug, warn};

use crate::api::open_meteo::{GeocodingResponse, OpenMeteoClient};
use crate::api::ApiError;
use crate::models::Location;

/// Pick the first geocoding hit, or report that nothing matched
pub fn first_result(place: &str, response: GeocodingResponse) -> Result<Location, ApiError> {
    response
        .results
        .into_iter()
        .next()
        .map(|r| Location {
            latitude: r.latitude,
            longitude: r.longitude,
            canonical_name: r.name,
        })
        .ok_or_else(|| ApiError::NotFound(format!("No geocoding results for '{}'", place)))
}

/// Look up `place`, surfacing any failure to the caller
pub async fn try_resolve(client: &OpenMeteoClient, place: &str) -> Result<Location, ApiError> {
    let response = client.search_location(place, 1).await?;
    first_result(place, response)
}

/// Resolve `place` to coordinates. Never fails: anything that goes wrong
/// resolves to [`Location::fallback`].
pub async fn resolve(client: &OpenMeteoClient, place: &str) -> Location {
    match try_resolve(client, place).await {
        Ok(location) => {
            debug!(
                "Resolved '{}' to {} ({}, {})",
                place, location.canonical_name, location.latitude, location.longitude
            );
            location
        }
        Err(e) => {
            warn!("Error geocoding location '{}': {}. Using fallback location", place, e);
            Location::fallback()
        }
    }
}
