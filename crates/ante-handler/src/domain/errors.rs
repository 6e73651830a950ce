//! # Ante Errors
//!
//! Every way a decorator can reject a transaction. Errors are returned to the
//! host unchanged; nothing in the pipeline wraps or retries them.
//!
//! ## Kinds
//!
//! | Kind | Variants | When |
//! |------|----------|------|
//! | `Decode` | `TxDecode` | Tx lacks a capability a decorator needs |
//! | `InsufficientFee` | `InsufficientFee`, `GasPriceTooLow` | No fee floor satisfied |
//! | `OutOfGas` | `OutOfGas`, `ZeroGas`, `GasOverflow` | Gas budget exhausted or zero |
//! | `Configuration` | `Configuration` | Chain assembly with a missing collaborator |
//! | `Upstream` | everything else | Signature, memo, timeout, relay, keeper failures |

use thiserror::Error;

/// Coarse classification of an [`AnteError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    InsufficientFee,
    OutOfGas,
    Configuration,
    Upstream,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode",
            ErrorKind::InsufficientFee => "insufficient_fee",
            ErrorKind::OutOfGas => "out_of_gas",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Upstream => "upstream",
        }
    }
}

/// Errors raised by ante decorators and chain assembly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnteError {
    /// Tx is not of the shape a decorator requires.
    #[error("tx parse error: {0}")]
    TxDecode(String),

    /// Fee below the validator floor (and not covered by conversion).
    #[error("insufficient fees; got: {got} required: {required}")]
    InsufficientFee { got: String, required: String },

    /// Fee converted to the base denom is below the live base gas price.
    #[error("insufficient fees; effective gas price {effective} is below base gas price {base_gas_price}")]
    GasPriceTooLow {
        effective: String,
        base_gas_price: String,
    },

    /// Gas meter limit exceeded.
    #[error("out of gas in location: {descriptor}; gasWanted: {limit}, gasUsed: {consumed}")]
    OutOfGas {
        descriptor: String,
        limit: u64,
        consumed: u64,
    },

    /// Declared gas limit of zero on a non-simulated call.
    #[error("must provide positive gas")]
    ZeroGas,

    /// Gas accounting overflowed `u64`.
    #[error("gas overflow in location: {0}")]
    GasOverflow(String),

    /// Chain assembly failed because a collaborator is missing.
    #[error("invalid ante handler configuration: {0}")]
    Configuration(String),

    /// Tx failed its own stateless checks.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Signature does not verify.
    #[error("signature verification failed: {0}")]
    Unauthorized(String),

    /// Signature sequence does not match the account.
    #[error("account sequence mismatch, expected {expected}, got {got}")]
    WrongSequence { expected: u64, got: u64 },

    #[error("maximum number of characters is {max} but received {got} characters")]
    MemoTooLarge { max: u64, got: u64 },

    #[error("block height: {height}, timeout height: {timeout}")]
    TxTimeoutHeight { height: u64, timeout: u64 },

    #[error("tx contains only redundant relay messages")]
    RedundantRelay,

    #[error("account {0} does not exist")]
    UnknownAddress(String),

    #[error("invalid pubkey: {0}")]
    InvalidPubKey(String),

    #[error("signatures: {got}, limit: {limit}")]
    TooManySignatures { got: u64, limit: u64 },

    #[error("unknown extension option: {0}")]
    UnknownExtensionOptions(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Priority may be written once per call.
    #[error("priority already set to {0}")]
    PriorityAlreadySet(i64),

    /// Collaborator failure passed through as-is.
    #[error("keeper error: {0}")]
    Keeper(String),
}

impl AnteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnteError::TxDecode(_) => ErrorKind::Decode,
            AnteError::InsufficientFee { .. } | AnteError::GasPriceTooLow { .. } => {
                ErrorKind::InsufficientFee
            }
            AnteError::OutOfGas { .. } | AnteError::ZeroGas | AnteError::GasOverflow(_) => {
                ErrorKind::OutOfGas
            }
            AnteError::Configuration(_) => ErrorKind::Configuration,
            _ => ErrorKind::Upstream,
        }
    }

    pub(crate) fn not_fee_tx() -> Self {
        AnteError::TxDecode("Tx must be a FeeTx".to_string())
    }
}
