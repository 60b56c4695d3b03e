//! User registration and identity endpoints

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::routes::{error_response, json_response};
use crate::server::AppState;
use crate::types::WicketError;

/// POST /users request body. Absent fields are treated as empty so the
/// validation layer owns the "Missing …" errors.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User view returned by POST /users and GET /users/me.
/// Never carries the password digest.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

/// POST /users
pub async fn handle_create_user(state: &AppState, body: &[u8]) -> Response<Full<Bytes>> {
    let request: CreateUserRequest = if body.is_empty() {
        CreateUserRequest::default()
    } else {
        match serde_json::from_slice(body) {
            Ok(r) => r,
            Err(_) => {
                return error_response(&WicketError::Http("Invalid JSON body".into()));
            }
        }
    };

    match state.auth.register_user(&request.email, &request.password).await {
        Ok(user) => json_response(
            StatusCode::CREATED,
            &UserResponse {
                id: user.id,
                email: user.email,
            },
        ),
        Err(e) => error_response(&e),
    }
}

/// GET /users/me
pub async fn handle_me(state: &AppState, token: Option<&str>) -> Response<Full<Bytes>> {
    match state.auth.fetch_identity(token).await {
        Ok(user) => json_response(
            StatusCode::OK,
            &UserResponse {
                id: user.id,
                email: user.email,
            },
        ),
        Err(e) => error_response(&e),
    }
}
