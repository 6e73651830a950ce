use super::{AnteDecorator, Next};
use crate::domain::{AnteError, Context, GasMeter, Tx};

/// Installs the tx's gas meter. Must be first in every chain.
///
/// Simulation and genesis run on an infinite meter; everything else is
/// capped at the declared gas limit.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetUpContextDecorator;

impl AnteDecorator for SetUpContextDecorator {
    fn name(&self) -> &'static str {
        "setup_context"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let fee_tx = tx.as_fee_tx().ok_or_else(AnteError::not_fee_tx)?;

        let meter = if simulate || ctx.is_genesis() {
            GasMeter::infinite()
        } else {
            GasMeter::new(fee_tx.gas())
        };
        ctx.set_gas_meter(meter);

        next.run(ctx, tx, simulate)
    }
}
