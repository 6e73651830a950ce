//! Per-signature verification gas.
//!
//! [`DefaultSigGasConsumer`] prices the standard key types.
//! [`EthSecp256k1GasConsumer`] adds Ethereum-style secp256k1 keys and hands
//! every other key to the default unchanged.

use super::errors::AnteError;
use super::gas::GasMeter;
use super::keys::PubKey;
use super::tx::SignatureV2;
use crate::config::AuthParams;

/// Charges the cost of verifying one signature.
pub trait SignatureGasConsumer: Send + Sync {
    fn consume(
        &self,
        meter: &mut GasMeter,
        sig: &SignatureV2,
        pub_key: &PubKey,
        params: &AuthParams,
    ) -> Result<(), AnteError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSigGasConsumer;

impl SignatureGasConsumer for DefaultSigGasConsumer {
    fn consume(
        &self,
        meter: &mut GasMeter,
        _sig: &SignatureV2,
        pub_key: &PubKey,
        params: &AuthParams,
    ) -> Result<(), AnteError> {
        match pub_key {
            PubKey::Ed25519(_) => {
                meter.consume_gas(params.sig_verify_cost_ed25519, "ante verify: ed25519")?;
                Err(AnteError::InvalidPubKey(
                    "ED25519 public keys are unsupported".into(),
                ))
            }
            PubKey::Secp256k1(_) => {
                meter.consume_gas(params.sig_verify_cost_secp256k1, "ante verify: secp256k1")
            }
            PubKey::Secp256r1(_) => meter.consume_gas(
                params.sig_verify_cost_secp256r1(),
                "ante verify: secp256r1",
            ),
            other => Err(AnteError::InvalidPubKey(format!(
                "unrecognized public key type: {}",
                other.kind()
            ))),
        }
    }
}

/// Adds `EthSecp256k1` on top of another consumer.
pub struct EthSecp256k1GasConsumer<D = DefaultSigGasConsumer> {
    fallback: D,
}

impl EthSecp256k1GasConsumer {
    pub fn new() -> Self {
        Self {
            fallback: DefaultSigGasConsumer,
        }
    }
}

impl Default for EthSecp256k1GasConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: SignatureGasConsumer> EthSecp256k1GasConsumer<D> {
    pub fn with_fallback(fallback: D) -> Self {
        Self { fallback }
    }
}

impl<D: SignatureGasConsumer> SignatureGasConsumer for EthSecp256k1GasConsumer<D> {
    fn consume(
        &self,
        meter: &mut GasMeter,
        sig: &SignatureV2,
        pub_key: &PubKey,
        params: &AuthParams,
    ) -> Result<(), AnteError> {
        match pub_key {
            PubKey::EthSecp256k1(_) => meter.consume_gas(
                params.sig_verify_cost_secp256k1,
                "ante verify: eth_secp256k1",
            ),
            _ => self.fallback.consume(meter, sig, pub_key, params),
        }
    }
}
