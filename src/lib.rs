//! Wicket - HTTP gateway for the files-manager stores
//!
//! Wicket fronts two backing stores with a small JSON API:
//!
//! - **MongoDB** (persistent): durable `users` and `files` records
//! - **Redis** (ephemeral): session-token bindings with a 24 h TTL
//!
//! Clients register with an email/password pair, sign in with HTTP Basic
//! credentials to obtain an opaque bearer token, and present that token in
//! `X-Token` for authenticated requests. Liveness and usage counters for both
//! stores are exposed at `/status` and `/stats`.

pub mod auth;
pub mod config;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, WicketError};
