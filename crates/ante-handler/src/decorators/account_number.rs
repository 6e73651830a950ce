//! # Account-Number Guard
//!
//! Check, re-check, simulation and finalize may run at the same time, each on
//! its own uncommitted snapshot, and all start from the same "next account
//! number". Before anything in a non-finalize execution can create an
//! account, the guard moves that execution's counter into its own range:
//!
//! | Execution | Counter after guard |
//! |-----------|---------------------|
//! | check / re-check | `N + offset` |
//! | simulate | `N + 2 * offset` |
//! | finalize | `N` (untouched) |
//!
//! Accounts minted by a speculative execution therefore never share a number
//! with ones minted by finalize or by another kind of speculative execution.
//! The snapshot is discarded afterwards, so the advance is never committed.

use super::{AnteDecorator, Next};
use crate::domain::{AnteError, Context, ExecutionMode, Tx};
use crate::ports::AccountKeeper;
use node_telemetry::ACCOUNT_NUMBER_RESERVATIONS;
use std::sync::Arc;
use tracing::debug;

pub struct AccountNumberGuardDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
    offset: u64,
}

impl AccountNumberGuardDecorator {
    pub fn new(account_keeper: Arc<dyn AccountKeeper>, offset: u64) -> Self {
        Self {
            account_keeper,
            offset,
        }
    }

    fn reserve(&self, ctx: &mut Context, offset: u64) -> Result<u64, AnteError> {
        let keeper = &self.account_keeper;
        ctx.with_infinite_gas_meter(|ctx| {
            let current = keeper.peek_next_account_number(ctx)?;
            let next = current
                .checked_add(offset)
                .ok_or_else(|| AnteError::Keeper("account number overflow".into()))?;
            keeper.set_next_account_number(ctx, next)?;
            Ok(next)
        })
    }
}

impl AnteDecorator for AccountNumberGuardDecorator {
    fn name(&self) -> &'static str {
        "account_number_guard"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let simulating = simulate || ctx.mode() == ExecutionMode::Simulate;
        if !ctx.is_check_tx() && !simulating {
            return next.run(ctx, tx, simulate);
        }

        let (offset, label) = if simulating {
            (self.offset.saturating_mul(2), "simulate")
        } else {
            (self.offset, ctx.mode().as_str())
        };

        let reserved = self.reserve(ctx, offset)?;
        ACCOUNT_NUMBER_RESERVATIONS.with_label_values(&[label]).inc();
        debug!(mode = %ctx.mode(), offset, next_account_number = reserved, "account numbers offset");

        next.run(ctx, tx, simulate)
    }
}
