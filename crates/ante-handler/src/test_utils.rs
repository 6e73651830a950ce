//! Fixtures shared by the unit tests.

use crate::domain::{
    keccak256, sha256, AnteError, BaseAccount, FeeTx, PubKey, SignatureV2, SignerData, StdTx, Tx,
};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey};
use shared_types::{Address, Msg};

/// A tx with no fee data, no messages and no signatures.
pub struct BareTx;

impl Tx for BareTx {
    fn msgs(&self) -> &[Msg] {
        &[]
    }

    fn as_fee_tx(&self) -> Option<&dyn FeeTx> {
        None
    }

    fn signers(&self) -> Vec<Address> {
        Vec::new()
    }

    fn signatures(&self) -> &[SignatureV2] {
        &[]
    }

    fn sign_bytes(&self, _signer: &SignerData) -> Result<Vec<u8>, AnteError> {
        Ok(Vec::new())
    }

    fn size_bytes(&self) -> u64 {
        0
    }
}

/// A freshly generated secp256k1 key and the address it controls.
pub struct TestAccount {
    pub signing_key: SigningKey,
    pub pub_key: PubKey,
    pub address: Address,
}

impl TestAccount {
    pub fn secp256k1() -> Self {
        Self::generate(PubKey::Secp256k1)
    }

    pub fn eth_secp256k1() -> Self {
        Self::generate(PubKey::EthSecp256k1)
    }

    fn generate(wrap: fn(Vec<u8>) -> PubKey) -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let encoded = signing_key.verifying_key().to_encoded_point(true);
        let pub_key = wrap(encoded.as_bytes().to_vec());
        let address = pub_key.address().unwrap();
        Self {
            signing_key,
            pub_key,
            address,
        }
    }

    /// Stored account with this key already set.
    pub fn account(&self, account_number: u64) -> BaseAccount {
        BaseAccount {
            pub_key: Some(self.pub_key.clone()),
            ..BaseAccount::new(self.address, account_number)
        }
    }

    /// Low-S `r || s` signature in the digest this key type expects.
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let digest = match self.pub_key {
            PubKey::EthSecp256k1(_) => keccak256(payload),
            _ => sha256(payload),
        };
        let signature: Signature = self.signing_key.sign_prehash(&digest).unwrap();
        signature
            .normalize_s()
            .unwrap_or(signature)
            .to_bytes()
            .to_vec()
    }
}

/// Signs `tx` with each `(account, sequence)` in order.
pub fn sign_tx(tx: StdTx, signers: &[(&TestAccount, u64)], chain_id: &str) -> StdTx {
    let signatures = signers
        .iter()
        .map(|(account, sequence)| {
            let signer = SignerData {
                chain_id: chain_id.to_string(),
                address: account.address,
                sequence: *sequence,
            };
            let payload = tx.sign_bytes(&signer).unwrap();
            SignatureV2 {
                pub_key: Some(account.pub_key.clone()),
                data: account.sign(&payload),
                sequence: *sequence,
            }
        })
        .collect();
    tx.with_signatures(signatures)
}
