//! # Fee / Priority Evaluator
//!
//! Decides whether a tx's declared fee is acceptable and how it should be
//! ordered in the candidate pool.
//!
//! ## Floors
//!
//! | Floor | Source | Satisfied when |
//! |-------|--------|----------------|
//! | Live | dynamic-fee keeper | `base_amount >= ceil(base_gas_price * gas)` |
//! | Validator | `ctx.min_gas_prices()` | fee covers `ceil(min_price * gas)` in any denom, or `base_amount` covers the base-denom requirement |
//!
//! The floors are independent. With neither configured the fee is accepted;
//! otherwise at least one configured floor must be satisfied.
//!
//! Enforcement only happens during check/re-check. Every other mode returns
//! the fee with [`MIN_PRIORITY`], so block execution never re-judges a fee
//! against prices that may have moved since admission.

use super::context::Context;
use super::errors::AnteError;
use super::tx::Tx;
use crate::ports::DynamicFeeKeeper;
use node_telemetry::{metric_inc, metric_observe, FEE_REJECTIONS, TX_PRIORITY};
use shared_types::{Coin, Coins, Dec, DecCoins};
use std::sync::Arc;
use tracing::debug;

/// Lowest priority handed to an admitted tx.
pub const MIN_PRIORITY: i64 = 1;

/// Evaluates `(accepted_fee, priority)` for a tx.
pub trait TxFeeChecker: Send + Sync {
    fn check_tx_fee(&self, ctx: &mut Context, tx: &dyn Tx) -> Result<(Coins, i64), AnteError>;
}

impl<F> TxFeeChecker for F
where
    F: Fn(&mut Context, &dyn Tx) -> Result<(Coins, i64), AnteError> + Send + Sync,
{
    fn check_tx_fee(&self, ctx: &mut Context, tx: &dyn Tx) -> Result<(Coins, i64), AnteError> {
        self(ctx, tx)
    }
}

/// Result of pricing a fee against the live source.
struct LiveQuote {
    base_denom: String,
    base_amount: u128,
    base_gas_price: Dec,
    satisfied: bool,
}

/// Default evaluator: base-denom conversion through a live price source plus
/// the validator's local minimum gas prices.
#[derive(Clone, Default)]
pub struct MempoolFeeChecker {
    price_source: Option<Arc<dyn DynamicFeeKeeper>>,
}

impl MempoolFeeChecker {
    pub fn new(price_source: Option<Arc<dyn DynamicFeeKeeper>>) -> Self {
        Self { price_source }
    }

    fn quote(
        &self,
        ctx: &mut Context,
        source: &dyn DynamicFeeKeeper,
        fee: &Coins,
        gas: u64,
    ) -> Result<LiveQuote, AnteError> {
        let base_denom = source.base_denom(ctx)?;
        let mut base_amount: u128 = 0;
        for coin in fee.iter() {
            let spot = if coin.denom == base_denom {
                Dec::one()
            } else {
                source.base_spot_price(ctx, &coin.denom)?
            };
            base_amount = base_amount.saturating_add(spot.mul_int_truncate(coin.amount));
        }

        let base_gas_price = source.base_gas_price(ctx)?;
        let required = base_gas_price.mul_int_ceil(u128::from(gas));
        Ok(LiveQuote {
            base_denom,
            base_amount,
            base_gas_price,
            satisfied: base_amount >= required,
        })
    }
}

impl TxFeeChecker for MempoolFeeChecker {
    fn check_tx_fee(&self, ctx: &mut Context, tx: &dyn Tx) -> Result<(Coins, i64), AnteError> {
        let fee_tx = tx.as_fee_tx().ok_or_else(AnteError::not_fee_tx)?;
        let fee = fee_tx.fee().clone();
        let gas = fee_tx.gas();

        if !ctx.is_check_tx() {
            return Ok((fee, MIN_PRIORITY));
        }

        let mut priority = MIN_PRIORITY;
        let live = match &self.price_source {
            Some(source) => {
                let quote = self.quote(ctx, source.as_ref(), &fee, gas)?;
                if quote.base_amount > 1 {
                    priority = i64::try_from(quote.base_amount).unwrap_or(i64::MAX);
                }
                Some(quote)
            }
            None => None,
        };

        let min_gas_prices = ctx.min_gas_prices().clone();
        let validator = if min_gas_prices.is_zero() {
            None
        } else {
            let required = required_fees(gas, &min_gas_prices)?;
            let converted = live.as_ref().is_some_and(|q| {
                let required_base = required.amount_of(&q.base_denom);
                required_base > 0 && q.base_amount > 0 && q.base_amount >= required_base
            });
            let satisfied = required.is_empty() || fee.is_any_gte(&required) || converted;
            Some((required, satisfied))
        };

        let live_ok = live.as_ref().map(|q| q.satisfied);
        let validator_ok = validator.as_ref().map(|(_, ok)| *ok);
        let admitted = match (live_ok, validator_ok) {
            (None, None) => true,
            (live_ok, validator_ok) => live_ok == Some(true) || validator_ok == Some(true),
        };

        if admitted {
            debug!(gas_limit = gas, priority, fee = %fee, "fee accepted");
            metric_observe!(TX_PRIORITY, priority as f64);
            return Ok((fee, priority));
        }

        metric_inc!(FEE_REJECTIONS);
        let got = display_coins(&fee);
        if let Some((required, _)) = validator {
            debug!(gas_limit = gas, got = %got, required = %required, "fee below validator floor");
            return Err(AnteError::InsufficientFee {
                got,
                required: required.to_string(),
            });
        }

        // Only the live floor was configured, and it failed.
        let quote = live.ok_or_else(|| AnteError::Configuration("fee floor missing".into()))?;
        let effective = Dec::from_ratio(quote.base_amount, u128::from(gas)).unwrap_or_default();
        debug!(
            gas_limit = gas,
            effective = %effective,
            base_gas_price = %quote.base_gas_price,
            "fee below live gas price"
        );
        Err(AnteError::GasPriceTooLow {
            effective: effective.to_string(),
            base_gas_price: quote.base_gas_price.to_string(),
        })
    }
}

/// `ceil(price * gas)` per configured denom.
pub fn required_fees(gas: u64, min_gas_prices: &DecCoins) -> Result<Coins, AnteError> {
    let coins = min_gas_prices
        .iter()
        .map(|price| Coin::new(price.denom.clone(), price.amount.mul_int_ceil(u128::from(gas))))
        .collect();
    Coins::new(coins).map_err(|e| AnteError::InvalidRequest(e.to_string()))
}

fn display_coins(coins: &Coins) -> String {
    if coins.is_empty() {
        "0".to_string()
    } else {
        coins.to_string()
    }
}
