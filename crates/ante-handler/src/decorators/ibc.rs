use super::{AnteDecorator, Next};
use crate::domain::{AnteError, Context, Tx};
use crate::ports::IbcKeeper;
use std::sync::Arc;
use tracing::debug;

/// Rejects relay txs whose every packet message was already processed.
///
/// Only runs during check and re-check; a tx with at least one fresh packet
/// message, or none at all, passes.
pub struct RedundantRelayDecorator {
    ibc_keeper: Option<Arc<dyn IbcKeeper>>,
}

impl RedundantRelayDecorator {
    pub fn new(ibc_keeper: Option<Arc<dyn IbcKeeper>>) -> Self {
        Self { ibc_keeper }
    }
}

impl AnteDecorator for RedundantRelayDecorator {
    fn name(&self) -> &'static str {
        "redundant_relay"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        if let Some(ibc) = &self.ibc_keeper {
            if ctx.is_check_tx() && !simulate {
                let mut packet_msgs = 0usize;
                let mut redundant = 0usize;
                for msg in tx.msgs().iter().filter(|m| m.is_packet_msg()) {
                    packet_msgs += 1;
                    if ibc.is_redundant(ctx, msg)? {
                        redundant += 1;
                    }
                }
                if packet_msgs > 0 && redundant == packet_msgs {
                    debug!(packet_msgs, "redundant relay rejected");
                    return Err(AnteError::RedundantRelay);
                }
            }
        }
        next.run(ctx, tx, simulate)
    }
}
