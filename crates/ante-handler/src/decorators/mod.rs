//! # Ante Decorators
//!
//! A decorator inspects a tx, may reject it, may mutate the context, and
//! otherwise hands control to the rest of the chain through [`Next`].
//!
//! ## Contract
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Runs in configured order | `Next` walks the decorator slice front to back |
//! | Each runs at most once | `Next` is consumed by `run` |
//! | Error ends the chain | `?` on `next.run(..)`; nothing after the failing decorator executes |
//! | Errors pass through unchanged | Neither `Next` nor `AnteChain` maps errors |

mod account_number;
mod block_gas;
mod ext_options;
mod fee;
mod ibc;
mod setup;
mod sigverify;
mod validation;

pub use account_number::AccountNumberGuardDecorator;
pub use block_gas::BlockGasDecorator;
pub use ext_options::{ExtensionOptionChecker, ExtensionOptionsDecorator};
pub use fee::{CheckFeeDecorator, DeductFeeDecorator, FEE_COLLECTOR};
pub use ibc::RedundantRelayDecorator;
pub use setup::SetUpContextDecorator;
pub use sigverify::{
    IncrementSequenceDecorator, SetPubKeyDecorator, SigGasConsumeDecorator,
    SigVerificationDecorator,
};
pub use validation::{
    ConsumeGasForTxSizeDecorator, TxTimeoutHeightDecorator, ValidateBasicDecorator,
    ValidateMemoDecorator, ValidateSigCountDecorator,
};

use crate::domain::{AnteError, Context, Tx};
use std::sync::Arc;
use tracing::debug_span;

/// One step of an ante chain.
pub trait AnteDecorator: Send + Sync {
    /// Stable identifier used in spans and chain listings.
    fn name(&self) -> &'static str;

    /// Handles the tx, then calls `next.run(..)` exactly once unless it rejects.
    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError>;
}

/// Continuation over the decorators that have not run yet.
pub struct Next<'a> {
    rest: &'a [Arc<dyn AnteDecorator>],
}

impl<'a> Next<'a> {
    /// Continuation that runs nothing.
    pub fn end() -> Next<'static> {
        Next { rest: &[] }
    }

    pub fn run(self, ctx: &mut Context, tx: &dyn Tx, simulate: bool) -> Result<(), AnteError> {
        match self.rest.split_first() {
            None => Ok(()),
            Some((head, tail)) => {
                let _span = debug_span!("ante", decorator = head.name()).entered();
                head.ante_handle(ctx, tx, simulate, Next { rest: tail })
            }
        }
    }
}

/// An ordered, immutable decorator chain.
#[derive(Clone, Default)]
pub struct AnteChain {
    decorators: Vec<Arc<dyn AnteDecorator>>,
}

impl AnteChain {
    pub fn new(decorators: Vec<Arc<dyn AnteDecorator>>) -> Self {
        Self { decorators }
    }

    pub fn run(&self, ctx: &mut Context, tx: &dyn Tx, simulate: bool) -> Result<(), AnteError> {
        Next {
            rest: &self.decorators,
        }
        .run(ctx, tx, simulate)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}
