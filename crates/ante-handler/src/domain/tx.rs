//! # Transaction Model
//!
//! The pipeline consumes transactions through the [`Tx`] trait and never owns
//! their encoding. A tx is "fee-bearing" when [`Tx::as_fee_tx`] returns a
//! view; decorators that need fee data fail closed otherwise.
//!
//! [`StdTx`] is the concrete implementation the node and the tests use. Its
//! signature payload ([`sign_doc_bytes`]) covers the body, the chain id and
//! the signer's sequence. The account number is deliberately left out since
//! a brand-new signer is only numbered inside the pipeline itself.

use super::errors::AnteError;
use super::keys::PubKey;
use serde::Serialize;
use shared_types::{Address, Coins, Msg};

/// Fee-bearing view of a transaction.
pub trait FeeTx {
    fn fee(&self) -> &Coins;
    fn gas(&self) -> u64;
    /// Account the fee is taken from when no granter pays.
    fn fee_payer(&self) -> Address;
    fn fee_granter(&self) -> Option<Address>;
}

/// A transaction as seen by the ante pipeline.
pub trait Tx: Send + Sync {
    fn msgs(&self) -> &[Msg];

    /// `None` when the tx carries no fee/gas data.
    fn as_fee_tx(&self) -> Option<&dyn FeeTx>;

    /// Stateless well-formedness checks.
    fn validate_basic(&self) -> Result<(), AnteError> {
        Ok(())
    }

    fn memo(&self) -> &str {
        ""
    }

    /// Last block height at which the tx may be included, zero for none.
    fn timeout_height(&self) -> u64 {
        0
    }

    /// Type URLs of any non-critical extension options.
    fn extension_options(&self) -> &[String] {
        &[]
    }

    /// Required signers, in signature order.
    fn signers(&self) -> Vec<Address>;

    /// Signatures, index-aligned with [`Tx::signers`].
    fn signatures(&self) -> &[SignatureV2];

    /// Keys supplied alongside the signatures.
    fn pub_keys(&self) -> Vec<Option<PubKey>> {
        self.signatures()
            .iter()
            .map(|sig| sig.pub_key.clone())
            .collect()
    }

    /// Bytes the given signer is expected to have signed.
    fn sign_bytes(&self, signer: &SignerData) -> Result<Vec<u8>, AnteError>;

    /// Encoded size, charged per byte.
    fn size_bytes(&self) -> u64;
}

/// One signature over a tx.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureV2 {
    pub pub_key: Option<PubKey>,
    /// Raw signature, `r || s` for ECDSA keys.
    pub data: Vec<u8>,
    pub sequence: u64,
}

/// Per-signer data mixed into the sign payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerData {
    pub chain_id: String,
    pub address: Address,
    pub sequence: u64,
}

#[derive(Serialize)]
struct SignDoc<'a> {
    chain_id: &'a str,
    sequence: u64,
    body: &'a [u8],
}

/// Canonical sign payload for `body` under `signer`.
pub fn sign_doc_bytes(signer: &SignerData, body: &[u8]) -> Result<Vec<u8>, AnteError> {
    serde_json::to_vec(&SignDoc {
        chain_id: &signer.chain_id,
        sequence: signer.sequence,
        body,
    })
    .map_err(|e| AnteError::TxDecode(e.to_string()))
}

// =============================================================================
// STANDARD TX
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxBody {
    pub msgs: Vec<Msg>,
    pub memo: String,
    pub timeout_height: u64,
    pub fee: Coins,
    pub gas_limit: u64,
    pub payer: Option<Address>,
    pub granter: Option<Address>,
    pub extension_options: Vec<String>,
}

/// Standard fee-bearing transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StdTx {
    pub body: TxBody,
    pub signatures: Vec<SignatureV2>,
}

impl StdTx {
    pub fn new(msgs: Vec<Msg>) -> Self {
        Self {
            body: TxBody {
                msgs,
                memo: String::new(),
                timeout_height: 0,
                fee: Coins::empty(),
                gas_limit: 0,
                payer: None,
                granter: None,
                extension_options: Vec::new(),
            },
            signatures: Vec::new(),
        }
    }

    pub fn with_fee(mut self, fee: Coins, gas_limit: u64) -> Self {
        self.body.fee = fee;
        self.body.gas_limit = gas_limit;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.body.memo = memo.into();
        self
    }

    pub fn with_timeout_height(mut self, height: u64) -> Self {
        self.body.timeout_height = height;
        self
    }

    pub fn with_payer(mut self, payer: Address) -> Self {
        self.body.payer = Some(payer);
        self
    }

    pub fn with_granter(mut self, granter: Address) -> Self {
        self.body.granter = Some(granter);
        self
    }

    pub fn with_extension_option(mut self, type_url: impl Into<String>) -> Self {
        self.body.extension_options.push(type_url.into());
        self
    }

    pub fn with_signatures(mut self, signatures: Vec<SignatureV2>) -> Self {
        self.signatures = signatures;
        self
    }

    /// Deterministic encoding of the body.
    pub fn body_bytes(&self) -> Result<Vec<u8>, AnteError> {
        serde_json::to_vec(&self.body).map_err(|e| AnteError::TxDecode(e.to_string()))
    }
}

impl FeeTx for StdTx {
    fn fee(&self) -> &Coins {
        &self.body.fee
    }

    fn gas(&self) -> u64 {
        self.body.gas_limit
    }

    fn fee_payer(&self) -> Address {
        match self.body.payer {
            Some(payer) => payer,
            None => self.signers().first().copied().unwrap_or_default(),
        }
    }

    fn fee_granter(&self) -> Option<Address> {
        self.body.granter
    }
}

impl Tx for StdTx {
    fn msgs(&self) -> &[Msg] {
        &self.body.msgs
    }

    fn as_fee_tx(&self) -> Option<&dyn FeeTx> {
        Some(self)
    }

    fn validate_basic(&self) -> Result<(), AnteError> {
        if self.body.msgs.is_empty() {
            return Err(AnteError::InvalidRequest(
                "must contain at least one message".into(),
            ));
        }
        if self.signatures.is_empty() {
            return Err(AnteError::Unauthorized("no signatures supplied".into()));
        }
        let signers = self.signers();
        if signers.len() != self.signatures.len() {
            return Err(AnteError::Unauthorized(format!(
                "wrong number of signers; expected {}, got {}",
                signers.len(),
                self.signatures.len()
            )));
        }
        Ok(())
    }

    fn memo(&self) -> &str {
        &self.body.memo
    }

    fn timeout_height(&self) -> u64 {
        self.body.timeout_height
    }

    fn extension_options(&self) -> &[String] {
        &self.body.extension_options
    }

    fn signers(&self) -> Vec<Address> {
        let mut signers: Vec<Address> = Vec::new();
        for signer in self.body.msgs.iter().flat_map(|m| m.signers()) {
            if !signers.contains(&signer) {
                signers.push(signer);
            }
        }
        if let Some(payer) = self.body.payer {
            if !signers.contains(&payer) {
                signers.push(payer);
            }
        }
        signers
    }

    fn signatures(&self) -> &[SignatureV2] {
        &self.signatures
    }

    fn sign_bytes(&self, signer: &SignerData) -> Result<Vec<u8>, AnteError> {
        sign_doc_bytes(signer, &self.body_bytes()?)
    }

    fn size_bytes(&self) -> u64 {
        let body = self.body_bytes().map(|b| b.len()).unwrap_or_default();
        let sigs: usize = self
            .signatures
            .iter()
            .map(|s| s.data.len() + s.pub_key.as_ref().map_or(0, |k| k.bytes().len()))
            .sum();
        (body + sigs) as u64
    }
}
