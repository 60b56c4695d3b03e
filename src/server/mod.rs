//! HTTP server for Wicket

pub mod http;

pub use http::{run, AppState};
