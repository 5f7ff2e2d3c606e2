use hyper::{Body, Response, StatusCode};

use crate::models::DashboardView;
use crate::routes::json_response;

/// The view as JSON: controls, status, cards, stats, charts (SVG strings)
/// and the last-updated stamp
pub fn dashboard_json(view: &DashboardView) -> Response<Body> {
    json_response(StatusCode::OK, view)
}
