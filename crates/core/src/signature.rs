//! Gateway receipt signatures.
//!
//! The gateway signs `{gateway_order_id}|{payment_id}` with HMAC-SHA256 using the shared
//! key secret and hands the hex digest to the client. The server recomputes it before any
//! order is marked paid.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Separator between the gateway order id and the payment id in the signed payload.
pub const SIGNATURE_SEPARATOR: char = '|';

/// Shared secret used to sign gateway receipts.
#[derive(Clone)]
pub struct GatewaySecret {
    bytes: Vec<u8>,
}

impl GatewaySecret {
    /// Wrap raw secret bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for GatewaySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GatewaySecret(**redacted**)")
    }
}

impl Drop for GatewaySecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Signing and verification failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The secret cannot key the MAC.
    #[error("gateway secret cannot be used as a signing key")]
    InvalidKey,

    /// The signature is not a hex string.
    #[error("signature is not valid hex")]
    Malformed,

    /// The signature does not match the payload.
    #[error("signature does not match payment receipt")]
    Mismatch,
}

/// Canonical signed payload for a receipt.
#[must_use]
pub fn signing_payload(gateway_order_id: &str, payment_id: &str) -> String {
    format!("{gateway_order_id}{SIGNATURE_SEPARATOR}{payment_id}")
}

fn keyed_mac(
    secret: &GatewaySecret,
    gateway_order_id: &str,
    payment_id: &str,
) -> Result<HmacSha256, SignatureError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|_invalid| SignatureError::InvalidKey)?;

    mac.update(signing_payload(gateway_order_id, payment_id).as_bytes());

    Ok(mac)
}

/// Lower-case hex signature for a receipt.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKey`] if the secret cannot key the MAC.
pub fn sign(
    secret: &GatewaySecret,
    gateway_order_id: &str,
    payment_id: &str,
) -> Result<String, SignatureError> {
    let mac = keyed_mac(secret, gateway_order_id, payment_id)?;

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a client-supplied receipt signature in constant time.
///
/// # Errors
///
/// - [`SignatureError::Malformed`]: `signature` is not hex.
/// - [`SignatureError::Mismatch`]: the signature was not produced with `secret` over this
///   receipt.
pub fn verify(
    secret: &GatewaySecret,
    gateway_order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let expected =
        hex::decode(signature.trim()).map_err(|_invalid| SignatureError::Malformed)?;

    keyed_mac(secret, gateway_order_id, payment_id)?
        .verify_slice(&expected)
        .map_err(|_mismatch| SignatureError::Mismatch)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn secret() -> GatewaySecret {
        GatewaySecret::new("gateway_test_secret")
    }

    #[test]
    fn payload_joins_ids_with_pipe() {
        assert_eq!(signing_payload("order_1", "pay_1"), "order_1|pay_1");
    }

    #[test]
    fn signed_receipts_verify() -> TestResult {
        let signature = sign(&secret(), "order_1", "pay_1")?;

        verify(&secret(), "order_1", "pay_1", &signature)?;

        Ok(())
    }

    #[test]
    fn signature_matches_reference_digest() -> TestResult {
        assert_eq!(
            sign(&secret(), "order_1", "pay_1")?,
            "07ad78a340ef28845dc142b3fcfb8be83596f381f46e90cf6507b9f69dfd9da5"
        );

        Ok(())
    }

    #[test]
    fn upper_case_hex_is_accepted() -> TestResult {
        let signature = sign(&secret(), "order_1", "pay_1")?.to_uppercase();

        verify(&secret(), "order_1", "pay_1", &signature)?;

        Ok(())
    }

    #[test]
    fn forged_signatures_are_rejected() -> TestResult {
        let forged = sign(&GatewaySecret::new("attacker"), "order_1", "pay_1")?;

        assert_eq!(
            verify(&secret(), "order_1", "pay_1", &forged),
            Err(SignatureError::Mismatch)
        );

        Ok(())
    }

    #[test]
    fn signatures_are_bound_to_the_receipt() -> TestResult {
        let signature = sign(&secret(), "order_1", "pay_1")?;

        assert_eq!(
            verify(&secret(), "order_2", "pay_1", &signature),
            Err(SignatureError::Mismatch)
        );

        Ok(())
    }

    #[test]
    fn truncated_signatures_are_rejected() -> TestResult {
        let signature = sign(&secret(), "order_1", "pay_1")?;

        assert_eq!(
            verify(&secret(), "order_1", "pay_1", signature.get(..32).unwrap_or_default()),
            Err(SignatureError::Mismatch)
        );

        Ok(())
    }

    #[test]
    fn non_hex_signatures_are_malformed() {
        assert_eq!(
            verify(&secret(), "order_1", "pay_1", "not-hex"),
            Err(SignatureError::Malformed)
        );
    }

    #[test]
    fn debug_output_is_redacted() {
        assert_eq!(format!("{:?}", secret()), "GatewaySecret(**redacted**)");
    }
}
