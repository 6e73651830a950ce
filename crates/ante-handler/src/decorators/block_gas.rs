//! Block gas accumulation and gas-price publication.
//!
//! Accumulation happens only on the finalize execution of a non-simulated
//! call; check, re-check and simulation leave the block total untouched. The
//! write runs under an infinite gas meter so it never costs the tx gas.

use super::{AnteDecorator, Next};
use crate::domain::{AnteError, Context, ExecutionMode, Tx};
use crate::ports::DynamicFeeKeeper;
use node_telemetry::BLOCK_GAS_ACCUMULATED;
use shared_types::DecCoins;
use std::sync::Arc;
use tracing::debug;

pub struct BlockGasDecorator {
    dynamic_fee_keeper: Option<Arc<dyn DynamicFeeKeeper>>,
    publish_gas_prices: bool,
}

impl BlockGasDecorator {
    pub fn new(
        dynamic_fee_keeper: Option<Arc<dyn DynamicFeeKeeper>>,
        publish_gas_prices: bool,
    ) -> Self {
        Self {
            dynamic_fee_keeper,
            publish_gas_prices,
        }
    }
}

impl AnteDecorator for BlockGasDecorator {
    fn name(&self) -> &'static str {
        "block_gas"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let fee_tx = tx.as_fee_tx().ok_or_else(AnteError::not_fee_tx)?;
        let gas = fee_tx.gas();

        if self.publish_gas_prices {
            if !simulate && gas == 0 {
                return Err(AnteError::ZeroGas);
            }
            if gas > 0 {
                ctx.set_gas_prices(DecCoins::from_coins_per_gas(fee_tx.fee(), gas));
            }
        }

        if !simulate && ctx.mode() == ExecutionMode::Finalize {
            if let Some(keeper) = &self.dynamic_fee_keeper {
                ctx.with_infinite_gas_meter(|ctx| keeper.accumulate_gas(ctx, gas))?;
                BLOCK_GAS_ACCUMULATED.inc_by(gas as f64);
                debug!(gas_limit = gas, "block gas accumulated");
            }
        }

        next.run(ctx, tx, simulate)
    }
}
