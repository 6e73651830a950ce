//! Fee decorators.
//!
//! | Decorator | Chain | Evaluates | Writes priority | Moves funds |
//! |-----------|-------|-----------|-----------------|-------------|
//! | `CheckFeeDecorator` | minimal | unless simulating | yes | no |
//! | `DeductFeeDecorator` | full | unless simulating | yes | yes |

use super::{AnteDecorator, Next};
use crate::domain::{AnteError, Context, Tx, TxFeeChecker};
use crate::ports::{AccountKeeper, BankKeeper, FeegrantKeeper};
use shared_types::{address_to_hex, Coins};
use std::sync::Arc;
use tracing::debug;

/// Module account that receives deducted fees.
pub const FEE_COLLECTOR: &str = "fee_collector";

pub struct CheckFeeDecorator {
    fee_checker: Arc<dyn TxFeeChecker>,
}

impl CheckFeeDecorator {
    pub fn new(fee_checker: Arc<dyn TxFeeChecker>) -> Self {
        Self { fee_checker }
    }
}

impl AnteDecorator for CheckFeeDecorator {
    fn name(&self) -> &'static str {
        "check_fee"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        tx.as_fee_tx().ok_or_else(AnteError::not_fee_tx)?;

        if !simulate {
            let (_, priority) = self.fee_checker.check_tx_fee(ctx, tx)?;
            ctx.set_priority(priority)?;
            debug!(mode = %ctx.mode(), priority, "priority assigned");
        }

        next.run(ctx, tx, simulate)
    }
}

pub struct DeductFeeDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
    bank_keeper: Arc<dyn BankKeeper>,
    feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
    fee_checker: Arc<dyn TxFeeChecker>,
}

impl DeductFeeDecorator {
    pub fn new(
        account_keeper: Arc<dyn AccountKeeper>,
        bank_keeper: Arc<dyn BankKeeper>,
        feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
        fee_checker: Arc<dyn TxFeeChecker>,
    ) -> Self {
        Self {
            account_keeper,
            bank_keeper,
            feegrant_keeper,
            fee_checker,
        }
    }

    fn deduct(&self, ctx: &mut Context, tx: &dyn Tx, fee: &Coins) -> Result<(), AnteError> {
        let fee_tx = tx.as_fee_tx().ok_or_else(AnteError::not_fee_tx)?;
        let payer = fee_tx.fee_payer();
        let mut deduct_from = payer;

        if let Some(granter) = fee_tx.fee_granter() {
            let feegrant = self
                .feegrant_keeper
                .as_ref()
                .ok_or_else(|| AnteError::InvalidRequest("fee grants are not enabled".into()))?;
            if granter != payer {
                feegrant.use_granted_fees(ctx, &granter, &payer, fee, tx.msgs())?;
            }
            deduct_from = granter;
        }

        if self.account_keeper.get_account(ctx, &deduct_from)?.is_none() {
            return Err(AnteError::UnknownAddress(format!(
                "fee payer address: {}",
                address_to_hex(&deduct_from)
            )));
        }

        if !fee.is_zero() {
            self.bank_keeper
                .send_coins_from_account_to_module(ctx, &deduct_from, FEE_COLLECTOR, fee)?;
            debug!(payer = %address_to_hex(&deduct_from), fee = %fee, "fee deducted");
        }
        Ok(())
    }
}

impl AnteDecorator for DeductFeeDecorator {
    fn name(&self) -> &'static str {
        "deduct_fee"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let fee_tx = tx.as_fee_tx().ok_or_else(AnteError::not_fee_tx)?;

        if !simulate && !ctx.is_genesis() && fee_tx.gas() == 0 {
            return Err(AnteError::ZeroGas);
        }

        let (fee, priority) = if simulate {
            (fee_tx.fee().clone(), None)
        } else {
            let (fee, priority) = self.fee_checker.check_tx_fee(ctx, tx)?;
            (fee, Some(priority))
        };

        self.deduct(ctx, tx, &fee)?;

        if let Some(priority) = priority {
            ctx.set_priority(priority)?;
        }

        next.run(ctx, tx, simulate)
    }
}
