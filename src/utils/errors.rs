use thiserror::Error;

/// Errors raised by the dashboard itself (upstream failures live in `api::ApiError`)
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Invalid day count {0}: must be between 1 and 30")]
    InvalidDays(i64),
    #[error("Invalid query parameter '{0}': {1}")]
    InvalidQuery(String, String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("Server error: {0}")]
    Server(String),
}
