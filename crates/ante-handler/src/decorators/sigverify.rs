//! Signer-facing decorators: key population, signature gas, verification,
//! sequence increment.

use super::{AnteDecorator, Next};
use crate::domain::{
    AnteError, BaseAccount, Context, PubKey, SignatureGasConsumer, SignerData, Tx,
};
use crate::ports::{AccountAbstractionKeeper, AccountKeeper, SignModeHandler};
use shared_types::{address_to_hex, Address};
use std::sync::Arc;
use tracing::debug;

/// Stand-in key charged when a simulated tx names no key for a signer.
fn simulation_pub_key() -> PubKey {
    PubKey::Secp256k1(vec![0x02; 33])
}

fn signer_account(
    keeper: &dyn AccountKeeper,
    ctx: &mut Context,
    signer: &Address,
) -> Result<BaseAccount, AnteError> {
    keeper
        .get_account(ctx, signer)?
        .ok_or_else(|| AnteError::UnknownAddress(address_to_hex(signer)))
}

// =============================================================================
// SET PUB KEY
// =============================================================================

/// Binds supplied keys to signer accounts.
///
/// Signers without an account get one here, so this is the first point in
/// either chain where the account-number counter can advance.
pub struct SetPubKeyDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
}

impl SetPubKeyDecorator {
    pub fn new(account_keeper: Arc<dyn AccountKeeper>) -> Self {
        Self { account_keeper }
    }
}

impl AnteDecorator for SetPubKeyDecorator {
    fn name(&self) -> &'static str {
        "set_pub_key"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let pub_keys = tx.pub_keys();

        for (i, signer) in tx.signers().iter().enumerate() {
            let pub_key = pub_keys.get(i).cloned().flatten();
            if let Some(key) = &pub_key {
                if key.address()? != *signer {
                    return Err(AnteError::InvalidPubKey(format!(
                        "pubKey does not match signer address {} with signer index: {}",
                        address_to_hex(signer),
                        i
                    )));
                }
            }

            let (mut account, mut dirty) = match self.account_keeper.get_account(ctx, signer)? {
                Some(account) => (account, false),
                None => {
                    let account = self.account_keeper.new_account_with_address(ctx, signer)?;
                    debug!(
                        address = %address_to_hex(signer),
                        account_number = account.account_number,
                        simulate,
                        "signer account created"
                    );
                    (account, true)
                }
            };

            if account.pub_key.is_none() && pub_key.is_some() {
                account.pub_key = pub_key;
                dirty = true;
            }
            if dirty {
                self.account_keeper.set_account(ctx, account)?;
            }
        }

        next.run(ctx, tx, simulate)
    }
}

// =============================================================================
// SIGNATURE GAS
// =============================================================================

pub struct SigGasConsumeDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
    consumer: Arc<dyn SignatureGasConsumer>,
}

impl SigGasConsumeDecorator {
    pub fn new(
        account_keeper: Arc<dyn AccountKeeper>,
        consumer: Arc<dyn SignatureGasConsumer>,
    ) -> Self {
        Self {
            account_keeper,
            consumer,
        }
    }
}

impl AnteDecorator for SigGasConsumeDecorator {
    fn name(&self) -> &'static str {
        "sig_gas_consume"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let params = self.account_keeper.params();
        let signers = tx.signers();

        for (i, sig) in tx.signatures().iter().enumerate() {
            let signer = signers.get(i).ok_or_else(|| {
                AnteError::Unauthorized(format!("no signer for signature index {i}"))
            })?;
            let stored = match self.account_keeper.get_account(ctx, signer)? {
                Some(account) => account.pub_key,
                None if simulate => None,
                None => return Err(AnteError::UnknownAddress(address_to_hex(signer))),
            };
            let pub_key = match stored {
                Some(key) => key,
                None if simulate => simulation_pub_key(),
                None => {
                    return Err(AnteError::InvalidPubKey(
                        "pubkey on account is not set".into(),
                    ))
                }
            };
            self.consumer
                .consume(ctx.gas_meter_mut(), sig, &pub_key, &params)?;
        }

        next.run(ctx, tx, simulate)
    }
}

// =============================================================================
// SIGNATURE VERIFICATION
// =============================================================================

/// Checks sequences and verifies signatures.
///
/// Check and re-check accept any sequence at or above the stored one, since
/// the minimal chain never increments and pending txs from one sender are
/// ordered by the pool. Simulate and finalize require an exact match.
/// Verification is skipped when simulating or re-checking. Abstracted
/// accounts are verified by the account-abstraction keeper when one is wired.
pub struct SigVerificationDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
    sign_mode_handler: Arc<dyn SignModeHandler>,
    account_abstraction: Option<Arc<dyn AccountAbstractionKeeper>>,
}

impl SigVerificationDecorator {
    pub fn new(
        account_keeper: Arc<dyn AccountKeeper>,
        sign_mode_handler: Arc<dyn SignModeHandler>,
        account_abstraction: Option<Arc<dyn AccountAbstractionKeeper>>,
    ) -> Self {
        Self {
            account_keeper,
            sign_mode_handler,
            account_abstraction,
        }
    }
}

impl AnteDecorator for SigVerificationDecorator {
    fn name(&self) -> &'static str {
        "sig_verification"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        let sigs = tx.signatures();
        let signers = tx.signers();
        if sigs.len() != signers.len() {
            return Err(AnteError::Unauthorized(format!(
                "invalid number of signer;  expected: {}, got {}",
                signers.len(),
                sigs.len()
            )));
        }

        for (sig, signer) in sigs.iter().zip(signers.iter()) {
            let account = signer_account(self.account_keeper.as_ref(), ctx, signer)?;
            let abstracted = match &self.account_abstraction {
                Some(aa) => aa.is_abstracted(ctx, signer)?,
                None => false,
            };

            if account.pub_key.is_none() && !simulate && !abstracted {
                return Err(AnteError::InvalidPubKey(
                    "pubkey on account is not set".into(),
                ));
            }
            let stale = if ctx.is_check_tx() {
                sig.sequence < account.sequence
            } else {
                sig.sequence != account.sequence
            };
            if stale {
                return Err(AnteError::WrongSequence {
                    expected: account.sequence,
                    got: sig.sequence,
                });
            }

            if simulate || ctx.is_recheck_tx() {
                continue;
            }

            let sign_bytes = tx.sign_bytes(&SignerData {
                chain_id: ctx.chain_id().to_string(),
                address: *signer,
                sequence: sig.sequence,
            })?;

            if let (true, Some(aa)) = (abstracted, &self.account_abstraction) {
                aa.verify(ctx, signer, &sign_bytes, &sig.data)?;
                continue;
            }

            let pub_key = account
                .pub_key
                .as_ref()
                .ok_or_else(|| AnteError::InvalidPubKey("pubkey on account is not set".into()))?;
            self.sign_mode_handler
                .verify_signature(pub_key, &sign_bytes, &sig.data)?;
        }

        next.run(ctx, tx, simulate)
    }
}

// =============================================================================
// INCREMENT SEQUENCE
// =============================================================================

/// Bumps every signer's sequence once. Full chain only.
pub struct IncrementSequenceDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
}

impl IncrementSequenceDecorator {
    pub fn new(account_keeper: Arc<dyn AccountKeeper>) -> Self {
        Self { account_keeper }
    }
}

impl AnteDecorator for IncrementSequenceDecorator {
    fn name(&self) -> &'static str {
        "increment_sequence"
    }

    fn ante_handle(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> Result<(), AnteError> {
        for signer in tx.signers() {
            let mut account = signer_account(self.account_keeper.as_ref(), ctx, &signer)?;
            account.sequence = account
                .sequence
                .checked_add(1)
                .ok_or_else(|| AnteError::Keeper("sequence overflow".into()))?;
            self.account_keeper.set_account(ctx, account)?;
        }
        next.run(ctx, tx, simulate)
    }
}
