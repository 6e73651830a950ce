use super::{AnteDecorator, Next};
use crate::domain::{AnteError, Context, Tx};
use std::sync::Arc;

/// Accepts or rejects one extension option type URL.
pub type ExtensionOptionChecker = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Rejects txs carrying extension options the node does not understand.
/// Without a checker every option is rejected.
#[derive(Clone, Default)]
pub struct ExtensionOptionsDecorator {
    checker: Option<ExtensionOptionChecker>,
}

impl ExtensionOptionsDecorator {
    pub fn new(checker: Option<ExtensionOptionChecker>) -> Self {
        Self { checker }
    }
}

impl AnteDecorator for ExtensionOptionsDecorator {
    fn name(&self) -> &'static str {
        "extension_options"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        for option in tx.extension_options() {
            let accepted = self.checker.as_ref().is_some_and(|check| check(option));
            if !accepted {
                return Err(AnteError::UnknownExtensionOptions(option.clone()));
            }
        }
        next.run(ctx, tx, simulate)
    }
}
