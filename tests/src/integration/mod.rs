//! Cross-module scenarios.

pub mod accounts;
pub mod admission;
pub mod block_gas;
pub mod chains;
