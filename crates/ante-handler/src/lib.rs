//! # Ante Handler
//!
//! Transaction admission and fee-priority pipeline. Every tx passes through
//! an ordered chain of decorators before its messages execute; the chain
//! decides whether the tx is admitted, what it pays and how it is ranked.
//!
//! ## Execution Modes
//!
//! | Mode | Chain | Fee | Sequence | Gas accumulated |
//! |------|-------|-----|----------|-----------------|
//! | Check | minimal | evaluated, priority set | untouched | no |
//! | ReCheck | minimal | evaluated, priority set | untouched | no |
//! | Simulate | full | deducted, no floor | incremented | no |
//! | Finalize | full | evaluated and deducted | incremented | yes |
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Decorators run in order, each at most once | `decorators::Next` is consumed by `run` |
//! | First error ends the chain and is returned unchanged | `?` in every decorator |
//! | Priority is written once per execution | `Context::set_priority` |
//! | Speculative executions never reuse an account number finalize could assign | `AccountNumberGuardDecorator` |
//! | Block gas only counts finalized txs | `BlockGasDecorator` |
//! | Keeper bookkeeping outside the tx's gas budget | `Context::with_infinite_gas_meter` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  application/ - AnteHandler, HandlerOptions, chain assembly    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ builds ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  decorators/ - AnteDecorator, Next, AnteChain, standard steps  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ uses ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - AnteHandlerApi                             │
//! │  ports/outbound.rs - keepers, sign-mode handler                 │
//! │  domain/           - Context, Tx, fee evaluation, gas, keys     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - in-memory keepers, secp256k1 sign-mode handler     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let handler = AnteHandler::new(
//!     HandlerOptions::new(AnteConfig::from_env()?)
//!         .with_account_keeper(accounts)
//!         .with_bank_keeper(bank)
//!         .with_sign_mode_handler(Arc::new(Secp256k1SignModeHandler))
//!         .with_account_abstraction_keeper(aa)
//!         .with_fee_checker(fee_checker),
//! )?;
//!
//! let mut ctx = handler.new_context(ExecutionMode::Check, "chain-1", height);
//! handler.route(&mut ctx, &tx, false)?;
//! let priority = ctx.priority();
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod decorators;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod test_utils;

pub use application::{AnteHandler, HandlerOptions};
pub use config::{AnteConfig, AuthParams};
pub use decorators::{AnteChain, AnteDecorator, Next};
pub use domain::{AnteError, Context, ExecutionMode, FeeTx, StdTx, Tx, TxFeeChecker};
pub use ports::AnteHandlerApi;
