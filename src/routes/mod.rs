pub mod api;
pub mod dashboard;
pub mod health;
pub mod query;

use std::convert::Infallible;
use std::sync::Arc;

use hyper::{header, Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::models::DashboardView;
use crate::state::DashboardState;
use crate::utils::errors::DashboardError;

pub(crate) fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_string(value) {
        Ok(body) => Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

fn text_response(status: StatusCode, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(message.to_string()))
        .unwrap()
}

/// Apply query controls (refreshing) or fall back to the latest view
async fn resolve_view(state: &DashboardState, query: Option<&str>) -> Result<Arc<DashboardView>, DashboardError> {
    let current = state.controls().await;
    match query::parse_controls(query, &current)? {
        Some(controls) => Ok(state.refresh_with(controls).await),
        None => Ok(state.current().await),
    }
}

/// Top-level service: dispatches by method and path, adds CORS headers
pub async fn handle_request(state: Arc<DashboardState>, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    debug!("{} {}", req.method(), req.uri());

    if req.method() == Method::OPTIONS {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::empty())
            .unwrap());
    }

    let query = req.uri().query();
    let mut response = match (req.method(), req.uri().path()) {
        (&Method::GET, "/") => match resolve_view(&state, query).await {
            Ok(view) => dashboard::html_response(dashboard::render_page(&view, &state.config)),
            Err(e) => {
                warn!("Rejected dashboard request: {}", e);
                text_response(StatusCode::BAD_REQUEST, &e.to_string())
            }
        },
        (&Method::GET, "/api/dashboard") => match resolve_view(&state, query).await {
            Ok(view) => api::dashboard_json(&view),
            Err(e) => {
                warn!("Rejected API request: {}", e);
                json_response(StatusCode::BAD_REQUEST, &serde_json::json!({ "error": e.to_string() }))
            }
        },
        (&Method::GET, "/health") => health::execute(&state).await,
        _ => text_response(StatusCode::NOT_FOUND, "Not Found"),
    };

    response
        .headers_mut()
        .insert("Access-Control-Allow-Origin", header::HeaderValue::from_static("*"));
    Ok(response)
}
