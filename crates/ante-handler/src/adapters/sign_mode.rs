//! ECDSA sign-mode handler.
//!
//! | Key | Digest | Signature |
//! |-----|--------|-----------|
//! | `Secp256k1` | SHA-256 | 64-byte `r \|\| s`, low-S |
//! | `EthSecp256k1` | Keccak-256 | 64-byte `r \|\| s`, low-S |
//!
//! High-S signatures are rejected so one signed tx has exactly one valid
//! encoding.

use crate::domain::{keccak256, sha256, AnteError, PubKey};
use crate::ports::SignModeHandler;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};

#[derive(Clone, Copy, Debug, Default)]
pub struct Secp256k1SignModeHandler;

impl SignModeHandler for Secp256k1SignModeHandler {
    fn verify_signature(
        &self,
        pub_key: &PubKey,
        sign_bytes: &[u8],
        signature: &[u8],
    ) -> Result<(), AnteError> {
        let (key_bytes, digest) = match pub_key {
            PubKey::Secp256k1(bytes) => (bytes, sha256(sign_bytes)),
            PubKey::EthSecp256k1(bytes) => (bytes, keccak256(sign_bytes)),
            other => {
                return Err(AnteError::InvalidPubKey(format!(
                    "unsupported signing key type: {}",
                    other.kind()
                )))
            }
        };

        let key = VerifyingKey::from_sec1_bytes(key_bytes)
            .map_err(|_| AnteError::InvalidPubKey(format!("malformed {} key", pub_key.kind())))?;

        if signature.len() != 64 {
            return Err(AnteError::Unauthorized(format!(
                "signature must be 64 bytes, got {}",
                signature.len()
            )));
        }
        let signature = Signature::from_slice(signature)
            .map_err(|_| AnteError::Unauthorized("malformed signature".into()))?;
        if signature.normalize_s().is_some() {
            return Err(AnteError::Unauthorized(
                "signature is not in lower-S form".into(),
            ));
        }

        key.verify_prehash(&digest, &signature).map_err(|_| {
            AnteError::Unauthorized(
                "signature verification failed; please verify sequence and chain-id".into(),
            )
        })
    }
}
