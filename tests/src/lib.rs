//! # Ante Pipeline Scenario Suite
//!
//! Runs both decorator chains end to end against the in-memory keepers.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Keys, signed txs, a wired node
//! └── integration/
//!     ├── admission.rs  # Fee floors, priority, free messages
//!     ├── accounts.rs   # Account-number ranges per execution mode
//!     ├── block_gas.rs  # Gas accumulation and base price feedback
//!     └── chains.rs     # Minimal vs full behaviour, short-circuiting
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ante-tests
//! cargo test -p ante-tests integration::accounts::
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
