//! Inbound (Driving) port: the API the host and the candidate pool call.
//!
//! All three entry points share one shape. On success the caller reads the
//! priority (and published gas prices) back off the context.

use crate::domain::{AnteError, Context, Tx};

pub trait AnteHandlerApi: Send + Sync {
    /// Runs the cheap chain used for check and re-check.
    fn run_minimal(&self, ctx: &mut Context, tx: &dyn Tx, simulate: bool)
        -> Result<(), AnteError>;

    /// Runs the chain used for simulation and finalization.
    fn run_full(&self, ctx: &mut Context, tx: &dyn Tx, simulate: bool) -> Result<(), AnteError>;

    /// Picks the chain from `ctx.mode()`.
    fn route(&self, ctx: &mut Context, tx: &dyn Tx, simulate: bool) -> Result<(), AnteError> {
        if ctx.is_check_tx() {
            self.run_minimal(ctx, tx, simulate)
        } else {
            self.run_full(ctx, tx, simulate)
        }
    }
}
