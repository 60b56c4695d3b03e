//! Store adapters for Wicket
//!
//! Two backends, two contracts:
//!
//! - [`PersistentStore`]: the durable document store (MongoDB) holding user
//!   and file records. Exact-match lookups and inserts only.
//! - [`EphemeralStore`]: the key-value store (Redis) holding session-token
//!   bindings with per-key expiration.
//!
//! Adapters are constructed explicitly at startup and injected into the
//! session manager and request handlers; there is no process-wide client
//! state. Both adapters are safe for concurrent use by construction.

pub mod mongo;
pub mod redis;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::types::Result;

pub use mongo::MongoStore;
pub use redis::RedisStore;

/// A persisted user record, as returned to callers.
///
/// The password digest is intentionally absent: it never leaves the store
/// layer except as a lookup filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned opaque identifier
    pub id: String,
    /// Unique email, case-sensitive exact match
    pub email: String,
}

/// Durable document store holding `users` and `files` collections.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    /// Cheap liveness check reflecting the current connection state.
    /// Request-path callers treat `false` as a per-request store failure,
    /// never as a reason to block.
    async fn is_alive(&self) -> bool;

    /// Number of documents in the `users` collection
    async fn nb_users(&self) -> Result<u64>;

    /// Number of documents in the `files` collection
    async fn nb_files(&self) -> Result<u64>;

    /// Exact-match lookup by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Exact-match lookup by email and password digest together. A miss never
    /// reveals which of the two did not match.
    async fn find_by_credentials(&self, email: &str, digest: &str) -> Result<Option<User>>;

    /// Lookup by store-assigned id. An id the store cannot parse is a miss,
    /// not an error.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Insert a new user record and return it with the store-assigned id
    async fn insert_user(&self, email: &str, digest: &str) -> Result<User>;
}

/// Key-value store with per-key expiration, used only for session bindings.
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Cheap liveness check reflecting the current connection state
    async fn is_alive(&self) -> bool;

    /// Value bound to `key`, or `None`. Absence is the only expiry signal:
    /// never-set, deleted and TTL-expired keys are indistinguishable.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Bind `key` to `value` for `ttl_secs` seconds in a single atomic set
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Remove `key`. Deleting an absent key is not an error at this layer.
    async fn del(&self, key: &str) -> Result<()>;
}
