//! # Execution Context
//!
//! Per-call state threaded through a decorator chain. The host creates one
//! per call and drops it when the call ends; nothing here is persisted.
//!
//! ## Modes
//!
//! | Mode | `is_check_tx` | Commits | Chain |
//! |------|---------------|---------|-------|
//! | `Check` | yes | no | minimal |
//! | `ReCheck` | yes | no | minimal |
//! | `Simulate` | no | no | full |
//! | `Finalize` | no | yes | full |

use super::errors::AnteError;
use super::gas::GasMeter;
use shared_types::DecCoins;
use std::fmt;

/// Why the host is evaluating a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// First admission into the candidate pool.
    Check,
    /// Periodic re-validation of a pending transaction.
    ReCheck,
    /// Dry run for gas estimation.
    Simulate,
    /// The one execution per transaction whose writes are committed.
    Finalize,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Check => "check",
            ExecutionMode::ReCheck => "recheck",
            ExecutionMode::Simulate => "simulate",
            ExecutionMode::Finalize => "finalize",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Context {
    mode: ExecutionMode,
    chain_id: String,
    block_height: u64,
    min_gas_prices: DecCoins,
    gas_meter: GasMeter,
    priority: Option<i64>,
    gas_prices: Option<DecCoins>,
}

impl Context {
    /// Fresh context with an infinite gas meter and no local fee floor.
    pub fn new(mode: ExecutionMode, chain_id: impl Into<String>, block_height: u64) -> Self {
        Self {
            mode,
            chain_id: chain_id.into(),
            block_height,
            min_gas_prices: DecCoins::empty(),
            gas_meter: GasMeter::infinite(),
            priority: None,
            gas_prices: None,
        }
    }

    /// Sets the validator-local minimum gas prices.
    pub fn with_min_gas_prices(mut self, min_gas_prices: DecCoins) -> Self {
        self.min_gas_prices = min_gas_prices;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// True for check and re-check.
    pub fn is_check_tx(&self) -> bool {
        matches!(self.mode, ExecutionMode::Check | ExecutionMode::ReCheck)
    }

    pub fn is_recheck_tx(&self) -> bool {
        self.mode == ExecutionMode::ReCheck
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn is_genesis(&self) -> bool {
        self.block_height == 0
    }

    pub fn min_gas_prices(&self) -> &DecCoins {
        &self.min_gas_prices
    }

    // -------------------------------------------------------------------------
    // Gas
    // -------------------------------------------------------------------------

    pub fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    pub fn gas_meter_mut(&mut self) -> &mut GasMeter {
        &mut self.gas_meter
    }

    pub fn set_gas_meter(&mut self, meter: GasMeter) {
        self.gas_meter = meter;
    }

    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<(), AnteError> {
        self.gas_meter.consume_gas(amount, descriptor)
    }

    /// Runs `f` with an infinite gas meter, then restores the original
    /// meter untouched. Work done inside `f` is never charged to the tx.
    pub fn with_infinite_gas_meter<R>(&mut self, f: impl FnOnce(&mut Context) -> R) -> R {
        let saved = std::mem::replace(&mut self.gas_meter, GasMeter::infinite());
        let result = f(self);
        self.gas_meter = saved;
        result
    }

    // -------------------------------------------------------------------------
    // Outputs read by the pool / downstream consumers
    // -------------------------------------------------------------------------

    /// Priority written by the fee decorator, zero if none ran.
    pub fn priority(&self) -> i64 {
        self.priority.unwrap_or_default()
    }

    /// Writes the priority. Fails if it was already written in this call.
    pub fn set_priority(&mut self, priority: i64) -> Result<(), AnteError> {
        if let Some(existing) = self.priority {
            return Err(AnteError::PriorityAlreadySet(existing));
        }
        self.priority = Some(priority);
        Ok(())
    }

    /// Per-gas price derived from the tx fee, when published.
    pub fn gas_prices(&self) -> Option<&DecCoins> {
        self.gas_prices.as_ref()
    }

    pub fn set_gas_prices(&mut self, gas_prices: DecCoins) {
        self.gas_prices = Some(gas_prices);
    }
}
