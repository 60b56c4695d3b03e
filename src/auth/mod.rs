//! Authentication for Wicket
//!
//! Provides:
//! - Basic-credential decoding and secret digests
//! - The session manager: sign-in, token resolution, sign-out, registration

pub mod credentials;
pub mod session;

pub use credentials::{decode_basic_header, digest, Credential, DecodeError};
pub use session::{SessionManager, SESSION_KEY_PREFIX, SESSION_TTL_SECS};
