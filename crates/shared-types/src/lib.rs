//! # Shared Types Crate
//!
//! Ledger primitives used by the ante pipeline and its collaborators.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Coins, decimals and messages are defined here
//!   so keepers, decorators and tests agree on one representation.
//! - **Canonical Ordering**: `Coins` and `DecCoins` are always sorted by denom
//!   and never carry zero amounts.
//! - **Fixed Point**: `Dec` is an 18-decimal fixed-point number backed by
//!   `U256`, so price arithmetic never touches floating point.

pub mod decimal;
pub mod entities;
pub mod errors;
pub mod msgs;

pub use decimal::{Dec, DEC_PRECISION};
pub use entities::*;
pub use errors::*;
pub use msgs::*;
