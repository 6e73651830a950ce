//! # Domain Layer - Ante Pipeline
//!
//! Pure types and algorithms the decorators are built from.
//!
//! ## Components
//!
//! - `context`: `ExecutionMode`, per-call `Context`
//! - `gas`: `GasMeter` and flat keeper costs
//! - `tx`: `Tx` / `FeeTx` capability traits, `StdTx`
//! - `keys`: `PubKey` and address derivation
//! - `account`: `BaseAccount`
//! - `fee`: `TxFeeChecker`, `MempoolFeeChecker`
//! - `free_lane`: `FreeMessageFeeChecker`
//! - `sig_gas`: `SignatureGasConsumer` implementations
//! - `errors`: `AnteError`

pub mod account;
pub mod context;
pub mod errors;
pub mod fee;
pub mod free_lane;
pub mod gas;
pub mod keys;
pub mod sig_gas;
pub mod tx;

pub use account::*;
pub use context::*;
pub use errors::*;
pub use fee::*;
pub use free_lane::*;
pub use gas::*;
pub use keys::*;
pub use sig_gas::*;
pub use tx::*;
