//! Public keys carried by signer accounts and signatures.
//!
//! Address derivation:
//! - Cosmos-style keys (`Secp256k1`, `Ed25519`, `Secp256r1`): first 20 bytes
//!   of SHA-256 over the encoded key.
//! - `EthSecp256k1`: last 20 bytes of Keccak-256 over the uncompressed point
//!   without its `0x04` prefix.

use super::errors::AnteError;
use k256::ecdsa::VerifyingKey;
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use shared_types::Address;

/// A signer's public key, tagged by algorithm.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PubKey {
    /// Compressed SEC1 secp256k1 point (33 bytes).
    Secp256k1(Vec<u8>),
    /// Ethereum-style secp256k1 key; compressed or uncompressed SEC1.
    EthSecp256k1(Vec<u8>),
    /// 32-byte Ed25519 key.
    Ed25519(Vec<u8>),
    /// Compressed SEC1 P-256 point.
    Secp256r1(Vec<u8>),
}

impl PubKey {
    pub fn kind(&self) -> &'static str {
        match self {
            PubKey::Secp256k1(_) => "secp256k1",
            PubKey::EthSecp256k1(_) => "eth_secp256k1",
            PubKey::Ed25519(_) => "ed25519",
            PubKey::Secp256r1(_) => "secp256r1",
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            PubKey::Secp256k1(b)
            | PubKey::EthSecp256k1(b)
            | PubKey::Ed25519(b)
            | PubKey::Secp256r1(b) => b,
        }
    }

    /// Derives the account address controlled by this key.
    pub fn address(&self) -> Result<Address, AnteError> {
        match self {
            PubKey::EthSecp256k1(bytes) => {
                let key = VerifyingKey::from_sec1_bytes(bytes)
                    .map_err(|_| AnteError::InvalidPubKey("malformed eth_secp256k1 key".into()))?;
                let point = key.to_encoded_point(false);
                let hash = keccak256(&point.as_bytes()[1..]);
                let mut address = [0u8; 20];
                address.copy_from_slice(&hash[12..]);
                Ok(address)
            }
            other => {
                if other.bytes().is_empty() {
                    return Err(AnteError::InvalidPubKey(format!(
                        "empty {} key",
                        other.kind()
                    )));
                }
                let hash = Sha256::digest(other.bytes());
                let mut address = [0u8; 20];
                address.copy_from_slice(&hash[..20]);
                Ok(address)
            }
        }
    }
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}
