use hyper::{Body, Response, StatusCode};

use crate::routes::json_response;
use crate::services::health_service;
use crate::state::DashboardState;

pub async fn execute(state: &DashboardState) -> Response<Body> {
    let last_updated = state.latest().await.map(|view| view.last_updated.clone());
    let metrics = health_service::get_health_metrics(last_updated);
    json_response(StatusCode::OK, &metrics)
}
