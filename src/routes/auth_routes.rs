//! Sign-in and sign-out endpoints

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::{empty_response, error_response, json_response};
use crate::server::AppState;

/// GET /connect response
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub token: String,
}

/// GET /connect
///
/// Exchanges `Authorization: Basic …` credentials for a fresh session token.
pub async fn handle_connect(state: &AppState, authorization: Option<&str>) -> Response<Full<Bytes>> {
    match state.auth.sign_in(authorization).await {
        Ok(token) => json_response(StatusCode::OK, &ConnectResponse { token }),
        Err(e) => error_response(&e),
    }
}

/// GET /disconnect
///
/// Destroys the session named by `X-Token`. 204 with no body on success.
pub async fn handle_disconnect(state: &AppState, token: Option<&str>) -> Response<Full<Bytes>> {
    match state.auth.sign_out(token).await {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(e) => error_response(&e),
    }
}
