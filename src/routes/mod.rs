//! HTTP routes for Wicket

pub mod auth_routes;
pub mod status;
pub mod users;

pub use auth_routes::{handle_connect, handle_disconnect};
pub use status::{handle_stats, handle_status};
pub use users::{handle_create_user, handle_me};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::error;

use crate::types::WicketError;

/// Error body shape shared by every failure response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serialize `body` as a JSON response with the given status
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap()
}

/// Empty-bodied response (204 on sign-out)
pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Render an error into its HTTP response.
///
/// Client errors carry their message verbatim. Unauthorized is always the
/// bare `Unauthorized`. Anything 5xx is logged server-side and rendered as a
/// generic `Internal Server Error` so store details never reach clients.
pub fn error_response(err: &WicketError) -> Response<Full<Bytes>> {
    let status = err.status_code();

    let message = match err {
        WicketError::Unauthorized => "Unauthorized".to_string(),
        WicketError::BadRequest(msg) => msg.clone(),
        WicketError::NotFound(msg) => msg.clone(),
        WicketError::Http(msg) => msg.clone(),
        other => {
            error!("Request failed: {}", other);
            "Internal Server Error".to_string()
        }
    };

    json_response(status, &ErrorResponse { error: message })
}

/// CORS preflight response
pub fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization, X-Token")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// JSON 404 for unknown routes
pub fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Not Found",
        "path": path,
    });

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
