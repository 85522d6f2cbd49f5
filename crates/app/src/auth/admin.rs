//! Admin bearer token.

use sha2::{Digest, Sha256};
use thiserror::Error;

const DIGEST_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminTokenError {
    #[error("admin token digest must be 64 hex characters")]
    InvalidDigest,
}

/// SHA-256 digest of the admin bearer token. The token itself is never configured.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminTokenDigest([u8; DIGEST_LEN]);

impl AdminTokenDigest {
    /// Parse a hex-encoded SHA-256 digest.
    ///
    /// # Errors
    ///
    /// Returns [`AdminTokenError::InvalidDigest`] unless `digest` is 32 bytes of hex.
    pub fn from_hex(digest: &str) -> Result<Self, AdminTokenError> {
        let mut bytes = [0_u8; DIGEST_LEN];

        hex::decode_to_slice(digest.trim(), &mut bytes)
            .map_err(|_invalid| AdminTokenError::InvalidDigest)?;

        Ok(Self(bytes))
    }

    /// Whether `token` hashes to this digest.
    #[must_use]
    pub fn verify(&self, token: &str) -> bool {
        let candidate = Sha256::digest(token.as_bytes());

        // Fold every byte so the comparison time does not depend on where they differ.
        candidate
            .iter()
            .zip(self.0.iter())
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for AdminTokenDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminTokenDigest(**redacted**)")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const ABC_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn matching_token_verifies() -> TestResult {
        let digest = AdminTokenDigest::from_hex(ABC_DIGEST)?;

        assert!(digest.verify("abc"));
        assert!(!digest.verify("abd"));

        Ok(())
    }

    #[test]
    fn malformed_digests_are_rejected() {
        for digest in ["", "abc", &ABC_DIGEST[..62], "zz"] {
            assert_eq!(
                AdminTokenDigest::from_hex(digest),
                Err(AdminTokenError::InvalidDigest),
                "{digest:?}"
            );
        }
    }
}
