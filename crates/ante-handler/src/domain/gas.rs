//! Gas metering.
//!
//! A `GasMeter` is either limited (the tx's declared gas limit) or infinite.
//! The infinite meter still counts consumption so bookkeeping cost remains
//! observable, it just never fails.

use super::errors::AnteError;

/// Flat cost of a keeper read.
pub const READ_COST_FLAT: u64 = 1_000;
/// Flat cost of a keeper write.
pub const WRITE_COST_FLAT: u64 = 2_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasMeter {
    limit: Option<u64>,
    consumed: u64,
}

impl GasMeter {
    /// Meter that fails once `limit` is exceeded.
    pub fn new(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            consumed: 0,
        }
    }

    /// Meter that never fails.
    pub fn infinite() -> Self {
        Self {
            limit: None,
            consumed: 0,
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.limit.is_none()
    }

    /// The limit, or `u64::MAX` for an infinite meter.
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(u64::MAX)
    }

    pub fn gas_consumed(&self) -> u64 {
        self.consumed
    }

    pub fn gas_remaining(&self) -> u64 {
        self.limit().saturating_sub(self.consumed)
    }

    /// Adds `amount` to consumption.
    ///
    /// Consumption is recorded even when it pushes a limited meter past its
    /// limit, matching how the host reports `gasUsed` on out-of-gas.
    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<(), AnteError> {
        match self.limit {
            None => {
                self.consumed = self.consumed.saturating_add(amount);
                Ok(())
            }
            Some(limit) => {
                self.consumed = self
                    .consumed
                    .checked_add(amount)
                    .ok_or_else(|| AnteError::GasOverflow(descriptor.to_string()))?;
                if self.consumed > limit {
                    return Err(AnteError::OutOfGas {
                        descriptor: descriptor.to_string(),
                        limit,
                        consumed: self.consumed,
                    });
                }
                Ok(())
            }
        }
    }
}
