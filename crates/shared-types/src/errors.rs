//! # Error Types
//!
//! Errors raised while constructing or combining ledger primitives.

use thiserror::Error;

/// Errors produced by coin and decimal handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoinError {
    /// Denomination does not match the accepted pattern.
    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    /// The same denomination appears twice in one set.
    #[error("duplicate denomination: {0}")]
    DuplicateDenom(String),

    /// Decimal string could not be parsed.
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    /// Coin string could not be parsed.
    #[error("invalid coin expression: {0}")]
    InvalidCoin(String),

    /// Arithmetic overflowed the amount type.
    #[error("amount overflow for denom {0}")]
    Overflow(String),
}
