//! Session token hashing.
//!
//! Session tokens are opaque to this service. Only their SHA-256 digest is stored, so a
//! leaked sessions table cannot be replayed.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Session token prefix.
pub const SESSION_TOKEN_PREFIX: &str = "mk";

/// Shortest bearer token worth looking up.
pub const SESSION_TOKEN_MIN_LEN: usize = 16;

/// Generate a new opaque session token.
#[must_use]
pub fn generate_session_token() -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Lower-case hex SHA-256 digest of a bearer token.
#[must_use]
pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
