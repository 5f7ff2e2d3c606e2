use url::form_urlencoded;

use crate::models::{Controls, DashboardMode, Days};
use crate::utils::errors::DashboardError;

/// Merge `mode`, `days` and `location` query parameters over `current`.
///
/// Returns `None` when the query carries none of them, so the caller can
/// serve the latest view instead of refreshing. `refresh=1` forces a new
/// refresh with the current controls.
pub fn parse_controls(query: Option<&str>, current: &Controls) -> Result<Option<Controls>, DashboardError> {
    let Some(query) = query else {
        return Ok(None);
    };

    let mut controls = current.clone();
    let mut touched = false;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "mode" => {
                controls.mode = DashboardMode::parse(&value);
                touched = true;
            }
            "days" => {
                let days: i64 = value
                    .trim()
                    .parse()
                    .map_err(|_| DashboardError::InvalidQuery("days".to_string(), value.to_string()))?;
                controls.days = Days::new(days)?;
                touched = true;
            }
            "location" => {
                controls.location = value.trim().to_string();
                touched = true;
            }
            "refresh" => touched = true,
            _ => {}
        }
    }

    Ok(touched.then_some(controls))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_query_keeps_latest() {
        assert_eq!(parse_controls(None, &Controls::default()).unwrap(), None);
        assert_eq!(parse_controls(Some("utm=x"), &Controls::default()).unwrap(), None);
    }

    #[test]
    fn test_merges_over_current() {
        let current = Controls {
            location: "Paris".to_string(),
            ..Controls::default()
        };

        let controls = parse_controls(Some("mode=weather&days=14"), &current).unwrap().unwrap();
        assert_eq!(controls.mode, DashboardMode::Weather);
        assert_eq!(controls.days.get(), 14);
        assert_eq!(controls.location, "Paris");

        let controls = parse_controls(Some("location=S%C3%A3o+Paulo"), &current).unwrap().unwrap();
        assert_eq!(controls.location, "São Paulo");
        assert_eq!(controls.mode, DashboardMode::Crypto);
    }

    #[test]
    fn test_refresh_flag_forces_refresh() {
        let controls = parse_controls(Some("refresh=1"), &Controls::default()).unwrap();
        assert_eq!(controls, Some(Controls::default()));
    }

    #[test]
    fn test_invalid_days() {
        let current = Controls::default();
        assert!(matches!(
            parse_controls(Some("days=0"), &current),
            Err(DashboardError::InvalidDays(0))
        ));
        assert!(matches!(
            parse_controls(Some("days=31"), &current),
            Err(DashboardError::InvalidDays(31))
        ));
        assert!(matches!(
            parse_controls(Some("days=week"), &current),
            Err(DashboardError::InvalidQuery(_, _))
        ));
    }
}
