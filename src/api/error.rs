use thiserror::Error;

/// Failure of a single upstream call
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 404, or a lookup that returned no results
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-success statuses
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Transport failure or timeout
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Body did not match the expected shape
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}
