//! Outbound (Driven) ports for the ante pipeline.
//!
//! Keepers the decorators depend on. Every method that touches state takes
//! the call's [`Context`] so implementations can charge gas against it and
//! operate on the snapshot that call was given.

use crate::config::AuthParams;
use crate::domain::{AnteError, BaseAccount, Context, PubKey};
use shared_types::{Address, Coins, Dec, Msg};

/// Account storage and the "next account number" counter.
pub trait AccountKeeper: Send + Sync {
    fn params(&self) -> AuthParams;

    fn get_account(
        &self,
        ctx: &mut Context,
        address: &Address,
    ) -> Result<Option<BaseAccount>, AnteError>;

    fn set_account(&self, ctx: &mut Context, account: BaseAccount) -> Result<(), AnteError>;

    /// Builds a fresh account, consuming the next account number.
    ///
    /// The account is not stored until passed to [`AccountKeeper::set_account`].
    fn new_account_with_address(
        &self,
        ctx: &mut Context,
        address: &Address,
    ) -> Result<BaseAccount, AnteError>;

    /// Reads the counter without advancing it.
    fn peek_next_account_number(&self, ctx: &mut Context) -> Result<u64, AnteError>;

    fn set_next_account_number(&self, ctx: &mut Context, next: u64) -> Result<(), AnteError>;
}

/// Balance transfers. Used only by fee deduction.
pub trait BankKeeper: Send + Sync {
    fn send_coins_from_account_to_module(
        &self,
        ctx: &mut Context,
        from: &Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), AnteError>;
}

/// Fee allowances granted by one account to another.
pub trait FeegrantKeeper: Send + Sync {
    /// Draws `fee` from the allowance `granter` gave `grantee`.
    fn use_granted_fees(
        &self,
        ctx: &mut Context,
        granter: &Address,
        grantee: &Address,
        fee: &Coins,
        msgs: &[Msg],
    ) -> Result<(), AnteError>;
}

/// Signature verification for a sign mode.
pub trait SignModeHandler: Send + Sync {
    fn verify_signature(
        &self,
        pub_key: &PubKey,
        sign_bytes: &[u8],
        signature: &[u8],
    ) -> Result<(), AnteError>;
}

/// Price source and block-gas bookkeeping of the dynamic-fee module.
pub trait DynamicFeeKeeper: Send + Sync {
    fn base_denom(&self, ctx: &mut Context) -> Result<String, AnteError>;

    /// Price of one unit of `denom` in base-denom units.
    fn base_spot_price(&self, ctx: &mut Context, denom: &str) -> Result<Dec, AnteError>;

    /// Current minimum price per gas, in base-denom units.
    fn base_gas_price(&self, ctx: &mut Context) -> Result<Dec, AnteError>;

    /// Adds `gas` to the running total for the current block.
    fn accumulate_gas(&self, ctx: &mut Context, gas: u64) -> Result<(), AnteError>;
}

/// Alternate authentication for abstracted (smart) accounts.
pub trait AccountAbstractionKeeper: Send + Sync {
    fn is_abstracted(&self, ctx: &mut Context, address: &Address) -> Result<bool, AnteError>;

    fn verify(
        &self,
        ctx: &mut Context,
        address: &Address,
        sign_bytes: &[u8],
        signature: &[u8],
    ) -> Result<(), AnteError>;
}

/// Packet-level redundancy queries against IBC state.
pub trait IbcKeeper: Send + Sync {
    /// True when the relay message was already processed.
    fn is_redundant(&self, ctx: &mut Context, msg: &Msg) -> Result<bool, AnteError>;
}

// =============================================================================
// TEST DOUBLES
// =============================================================================

/// Fixed-price source for unit tests.
#[cfg(test)]
pub struct MockDynamicFeeKeeper {
    pub base_denom: String,
    pub spot_prices: std::collections::HashMap<String, Dec>,
    pub base_gas_price: Dec,
    pub accumulated: parking_lot::Mutex<u64>,
}

#[cfg(test)]
impl MockDynamicFeeKeeper {
    pub fn new(base_denom: &str, base_gas_price: Dec) -> Self {
        Self {
            base_denom: base_denom.to_string(),
            spot_prices: std::collections::HashMap::new(),
            base_gas_price,
            accumulated: parking_lot::Mutex::new(0),
        }
    }

    pub fn with_spot_price(mut self, denom: &str, price: Dec) -> Self {
        self.spot_prices.insert(denom.to_string(), price);
        self
    }

    pub fn accumulated(&self) -> u64 {
        *self.accumulated.lock()
    }
}

#[cfg(test)]
impl DynamicFeeKeeper for MockDynamicFeeKeeper {
    fn base_denom(&self, _ctx: &mut Context) -> Result<String, AnteError> {
        Ok(self.base_denom.clone())
    }

    fn base_spot_price(&self, _ctx: &mut Context, denom: &str) -> Result<Dec, AnteError> {
        if denom == self.base_denom {
            return Ok(Dec::one());
        }
        Ok(self.spot_prices.get(denom).copied().unwrap_or_default())
    }

    fn base_gas_price(&self, _ctx: &mut Context) -> Result<Dec, AnteError> {
        Ok(self.base_gas_price)
    }

    fn accumulate_gas(&self, ctx: &mut Context, gas: u64) -> Result<(), AnteError> {
        ctx.consume_gas(crate::domain::WRITE_COST_FLAT, "accumulate block gas")?;
        *self.accumulated.lock() += gas;
        Ok(())
    }
}
