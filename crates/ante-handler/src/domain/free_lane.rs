//! Free-message exemption.
//!
//! Wraps any [`TxFeeChecker`]. A tx whose messages are *all* on the
//! allow-list skips fee evaluation and is admitted at [`MIN_PRIORITY`]. One
//! message outside the list sends the whole tx through the wrapped checker.

use super::context::Context;
use super::errors::AnteError;
use super::fee::{TxFeeChecker, MIN_PRIORITY};
use super::tx::Tx;
use node_telemetry::{metric_inc, FEE_EXEMPTIONS};
use shared_types::Coins;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub struct FreeMessageFeeChecker {
    inner: Arc<dyn TxFeeChecker>,
    free_types: BTreeSet<String>,
}

impl FreeMessageFeeChecker {
    pub fn new<I, S>(inner: Arc<dyn TxFeeChecker>, free_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner,
            free_types: free_types.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the tx has messages and every one of them is exempt.
    pub fn is_exempt(&self, tx: &dyn Tx) -> bool {
        let msgs = tx.msgs();
        !msgs.is_empty() && msgs.iter().all(|m| self.free_types.contains(m.type_url()))
    }
}

impl TxFeeChecker for FreeMessageFeeChecker {
    fn check_tx_fee(&self, ctx: &mut Context, tx: &dyn Tx) -> Result<(Coins, i64), AnteError> {
        let fee_tx = tx.as_fee_tx().ok_or_else(AnteError::not_fee_tx)?;

        if self.is_exempt(tx) {
            debug!(msgs = tx.msgs().len(), "free message tx, skipping fee check");
            metric_inc!(FEE_EXEMPTIONS);
            return Ok((fee_tx.fee().clone(), MIN_PRIORITY));
        }

        self.inner.check_tx_fee(ctx, tx)
    }
}
