//! Error types for Wicket

use hyper::StatusCode;

/// Main error type for Wicket operations
///
/// Store-adapter errors are never passed through verbatim to clients: the
/// session manager and route handlers classify failures into these variants
/// before they reach the HTTP layer, and 5xx details stay in the server log.
#[derive(Debug, thiserror::Error)]
pub enum WicketError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Deliberately undifferentiated: bad header, unknown email, wrong
    /// password and stale token all surface identically.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Startup-only: the persistent store never became alive within the
    /// readiness-gate budget. Fatal to boot.
    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WicketError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConnectionTimeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Http(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Implement From conversions for common error types

impl From<std::io::Error> for WicketError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for WicketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Http(format!("JSON error: {}", err))
    }
}

impl From<hyper::Error> for WicketError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<mongodb::error::Error> for WicketError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<redis::RedisError> for WicketError {
    fn from(err: redis::RedisError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// Result type alias for Wicket operations
pub type Result<T> = std::result::Result<T, WicketError>;
