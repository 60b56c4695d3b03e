//! Session manager: the authentication core
//!
//! The only component that touches both stores together. Sessions live solely
//! in the ephemeral store as `auth_{token}` -> user-id bindings with a 24 h
//! TTL; a binding's existence is the sole proof of authentication, and its
//! absence on lookup is the only expiry signal.
//!
//! Per token the state machine is absent -> active -> absent, with every
//! transition a single atomic key operation. Credential and token failures
//! all surface as the same undifferentiated `Unauthorized` so a caller cannot
//! probe which factor failed.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::credentials::{decode_basic_header, digest};
use crate::store::{EphemeralStore, PersistentStore, User};
use crate::types::{Result, WicketError};

/// Ephemeral-store key prefix for session bindings
pub const SESSION_KEY_PREFIX: &str = "auth_";

/// Session lifetime: 24 hours, fixed at creation, never renewed on access
pub const SESSION_TTL_SECS: u64 = 86_400;

/// Orchestrates sign-in, token resolution, sign-out and registration against
/// the injected store adapters.
#[derive(Clone)]
pub struct SessionManager {
    db: Arc<dyn PersistentStore>,
    kv: Arc<dyn EphemeralStore>,
}

fn session_key(token: &str) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, token)
}

impl SessionManager {
    pub fn new(db: Arc<dyn PersistentStore>, kv: Arc<dyn EphemeralStore>) -> Self {
        Self { db, kv }
    }

    /// Verify Basic credentials and mint a fresh session token.
    ///
    /// Any decode failure, unknown email or wrong secret yields the identical
    /// `Unauthorized`. A failure to write the binding is the only store error
    /// surfaced; the set is a single atomic operation so no partial session
    /// state is ever observable.
    pub async fn sign_in(&self, header: Option<&str>) -> Result<String> {
        let header = header.ok_or(WicketError::Unauthorized)?;
        let credential = decode_basic_header(header).map_err(|_| WicketError::Unauthorized)?;
        let digest = digest(&credential.secret);

        let user = self
            .db
            .find_by_credentials(&credential.identifier, &digest)
            .await?
            .ok_or_else(|| {
                debug!("Sign-in rejected for {}", credential.identifier);
                WicketError::Unauthorized
            })?;

        // Fresh, unguessable, never derived from user data
        let token = Uuid::new_v4().to_string();
        self.kv
            .set_ex(&session_key(&token), &user.id, SESSION_TTL_SECS)
            .await?;

        info!("Session opened for user {}", user.id);
        Ok(token)
    }

    /// Resolve a token to the bound user id.
    ///
    /// Pure read: no side effects and no TTL renewal, so idle sessions still
    /// expire at their original 24 h mark.
    pub async fn resolve_token(&self, token: Option<&str>) -> Result<String> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(WicketError::Unauthorized),
        };

        self.kv
            .get(&session_key(token))
            .await?
            .ok_or(WicketError::Unauthorized)
    }

    /// Destroy the session bound to `token`.
    ///
    /// The preceding existence check means a second sign-out of the same
    /// token reports `Unauthorized`, even though the delete itself is
    /// idempotent at the store layer.
    pub async fn sign_out(&self, token: Option<&str>) -> Result<()> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(WicketError::Unauthorized),
        };

        let user_id = self.resolve_token(Some(token)).await?;
        self.kv.del(&session_key(token)).await?;

        info!("Session closed for user {}", user_id);
        Ok(())
    }

    /// Resolve a token all the way to the user record.
    ///
    /// A missing user record behind a live session reports the same
    /// `Unauthorized` as an invalid token.
    pub async fn fetch_identity(&self, token: Option<&str>) -> Result<User> {
        let user_id = self.resolve_token(token).await?;

        self.db.find_by_id(&user_id).await?.ok_or_else(|| {
            warn!("Live session for missing user {}", user_id);
            WicketError::Unauthorized
        })
    }

    /// Create a new user record.
    ///
    /// Email uniqueness is a pre-insert existence check against the store;
    /// concurrent registrations of the same email can race past it (see
    /// DESIGN.md). The returned record carries the store-assigned id and the
    /// original email, never the digest.
    pub async fn register_user(&self, email: &str, password: &str) -> Result<User> {
        if email.is_empty() {
            return Err(WicketError::BadRequest("Missing email".into()));
        }
        if password.is_empty() {
            return Err(WicketError::BadRequest("Missing password".into()));
        }

        if self.db.find_by_email(email).await?.is_some() {
            return Err(WicketError::BadRequest("Already exist".into()));
        }

        let user = self.db.insert_user(email, &digest(password)).await?;
        info!("User {} registered", user.id);
        Ok(user)
    }
}
