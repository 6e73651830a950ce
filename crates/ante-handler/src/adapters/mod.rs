//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! | Adapter | Port |
//! |---------|------|
//! | `InMemoryAccountKeeper` | `AccountKeeper` |
//! | `InMemoryBankKeeper` | `BankKeeper` |
//! | `InMemoryFeegrantKeeper` | `FeegrantKeeper` |
//! | `InMemoryDynamicFeeKeeper` | `DynamicFeeKeeper` |
//! | `InMemoryAccountAbstraction` | `AccountAbstractionKeeper` |
//! | `InMemoryIbcKeeper` | `IbcKeeper` |
//! | `Secp256k1SignModeHandler` | `SignModeHandler` |

pub mod memory;
pub mod sign_mode;

pub use memory::{
    module_address, DynamicFeeParams, InMemoryAccountAbstraction, InMemoryAccountKeeper,
    InMemoryBankKeeper, InMemoryDynamicFeeKeeper, InMemoryFeegrantKeeper, InMemoryIbcKeeper,
};
pub use sign_mode::Secp256k1SignModeHandler;
