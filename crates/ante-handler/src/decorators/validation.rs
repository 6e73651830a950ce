//! Stateless and parameter-driven checks shared by both chains.

use super::{AnteDecorator, Next};
use crate::domain::{AnteError, Context, Tx};
use crate::ports::AccountKeeper;
use std::sync::Arc;

/// Size of a placeholder secp256k1 signature plus its compressed key,
/// charged for each missing signature while simulating.
const SIMULATED_SIG_BYTES: u64 = 64 + 33;

/// Runs `Tx::validate_basic`. Skipped on re-check, where the tx already
/// passed it once.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateBasicDecorator;

impl AnteDecorator for ValidateBasicDecorator {
    fn name(&self) -> &'static str {
        "validate_basic"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        if !ctx.is_recheck_tx() {
            tx.validate_basic()?;
        }
        next.run(ctx, tx, simulate)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TxTimeoutHeightDecorator;

impl AnteDecorator for TxTimeoutHeightDecorator {
    fn name(&self) -> &'static str {
        "tx_timeout_height"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let timeout = tx.timeout_height();
        if timeout > 0 && ctx.block_height() > timeout {
            return Err(AnteError::TxTimeoutHeight {
                height: ctx.block_height(),
                timeout,
            });
        }
        next.run(ctx, tx, simulate)
    }
}

pub struct ValidateMemoDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
}

impl ValidateMemoDecorator {
    pub fn new(account_keeper: Arc<dyn AccountKeeper>) -> Self {
        Self { account_keeper }
    }
}

impl AnteDecorator for ValidateMemoDecorator {
    fn name(&self) -> &'static str {
        "validate_memo"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let max = self.account_keeper.params().max_memo_characters;
        let got = tx.memo().chars().count() as u64;
        if got > max {
            return Err(AnteError::MemoTooLarge { max, got });
        }
        next.run(ctx, tx, simulate)
    }
}

/// Charges `tx_size_cost_per_byte` for every encoded byte.
pub struct ConsumeGasForTxSizeDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
}

impl ConsumeGasForTxSizeDecorator {
    pub fn new(account_keeper: Arc<dyn AccountKeeper>) -> Self {
        Self { account_keeper }
    }
}

impl AnteDecorator for ConsumeGasForTxSizeDecorator {
    fn name(&self) -> &'static str {
        "consume_gas_for_tx_size"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let cost_per_byte = self.account_keeper.params().tx_size_cost_per_byte;
        ctx.consume_gas(cost_per_byte.saturating_mul(tx.size_bytes()), "txSize")?;

        if simulate {
            // Unsigned simulations still pay for the signatures they will carry.
            let signers = tx.signers().len();
            let sigs = tx.signatures();
            let missing = signers.saturating_sub(sigs.len())
                + sigs.iter().filter(|s| s.data.is_empty()).count();
            let bytes = SIMULATED_SIG_BYTES.saturating_mul(missing as u64);
            ctx.consume_gas(cost_per_byte.saturating_mul(bytes), "txSize")?;
        }

        next.run(ctx, tx, simulate)
    }
}

pub struct ValidateSigCountDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
}

impl ValidateSigCountDecorator {
    pub fn new(account_keeper: Arc<dyn AccountKeeper>) -> Self {
        Self { account_keeper }
    }
}

impl AnteDecorator for ValidateSigCountDecorator {
    fn name(&self) -> &'static str {
        "validate_sig_count"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let limit = self.account_keeper.params().tx_sig_limit;
        let got = tx.signatures().len() as u64;
        if got > limit {
            return Err(AnteError::TooManySignatures { got, limit });
        }
        next.run(ctx, tx, simulate)
    }
}
