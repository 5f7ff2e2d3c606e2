use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ApiError;

/// Upstream bodies are truncated to this many characters inside error messages
const MAX_ERROR_BODY: usize = 200;

/// Build the shared HTTP client with a per-request timeout
pub fn build_http_client(timeout: Duration) -> Result<HttpClient, ApiError> {
    HttpClient::builder()
        .timeout(timeout)
        .user_agent(concat!("multi-data-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))
}

/// Map a non-success status to an error, keeping a short excerpt of the body
async fn handle_error_response(status: reqwest::StatusCode, response: reqwest::Response) -> ApiError {
    let status_code = status.as_u16();
    let body_text: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(MAX_ERROR_BODY)
        .collect();

    match status_code {
        404 => ApiError::NotFound(body_text),
        429 => {
            warn!("Upstream rate limit hit: {}", body_text);
            ApiError::RateLimited(body_text)
        }
        500..=599 => {
            warn!("Upstream server error {}: {}", status_code, body_text);
            ApiError::ServerError(status_code, body_text)
        }
        _ => ApiError::HttpError(status_code, body_text),
    }
}

/// GET `url` with `query` and decode the JSON body into `T`
pub async fn get_json<T>(http_client: &HttpClient, url: &str, query: &[(&str, String)]) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    debug!("GET {} {:?}", url, query);

    let response = http_client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(handle_error_response(status, response).await);
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            ApiError::RequestError(format!("Timed out reading response: {}", e))
        } else {
            ApiError::DeserializationError(format!("Failed to parse response: {}", e))
        }
    })
}
