//! Basic-credential decoding and secret digests
//!
//! The transport envelope is the HTTP Basic scheme: `Basic` followed by
//! base64(`identifier:secret`). Secrets are stored and compared as SHA-1 hex
//! digests, never as plaintext and never reversed.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha1::{Digest as _, Sha1};

/// Decoded credential pair. Lives for a single request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

/// Envelope decoding failure.
///
/// One variant on purpose: callers map every decode failure to the same
/// undifferentiated 401, so the codec does not distinguish causes either.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed authorization header")]
    MalformedHeader,
}

/// Decode an `Authorization` header value into a [`Credential`].
///
/// The value must be the literal scheme `Basic` (case-sensitive), one space,
/// then base64-encoded UTF-8 text of the form `identifier:secret`. The
/// decoded text is split on the **first** colon only, so secrets may
/// themselves contain colons. No trimming or case-folding is applied.
pub fn decode_basic_header(value: &str) -> Result<Credential, DecodeError> {
    let (scheme, payload) = value.split_once(' ').ok_or(DecodeError::MalformedHeader)?;
    if scheme != "Basic" {
        return Err(DecodeError::MalformedHeader);
    }

    let decoded = BASE64
        .decode(payload)
        .map_err(|_| DecodeError::MalformedHeader)?;
    let text = String::from_utf8(decoded).map_err(|_| DecodeError::MalformedHeader)?;

    let (identifier, secret) = text.split_once(':').ok_or(DecodeError::MalformedHeader)?;
    if identifier.is_empty() || secret.is_empty() {
        return Err(DecodeError::MalformedHeader);
    }

    Ok(Credential {
        identifier: identifier.to_string(),
        secret: secret.to_string(),
    })
}

/// One-way digest of a secret: SHA-1, lowercase hex, 40 characters.
///
/// Deterministic by contract — the same digest is computed at registration
/// and at verification and compared by exact match in the store query.
pub fn digest(secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
