//! Ante handler configuration.
//!
//! `AnteConfig` is built once at node startup and handed to
//! [`crate::application::HandlerOptions`]. `AuthParams` are the on-chain
//! account-module parameters served by the account keeper.

use crate::domain::AnteError;
use serde::{Deserialize, Serialize};
use shared_types::{DecCoins, MSG_ACKNOWLEDGEMENT_TYPE_URL, MSG_TIMEOUT_TYPE_URL, MSG_UPDATE_CLIENT_TYPE_URL};
use std::env;

/// Default account-number offset for check/re-check. Simulation uses twice this.
pub const DEFAULT_ACCOUNT_NUMBER_OFFSET: u64 = 1_000_000;

/// Pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnteConfig {
    /// Counter advance applied by the account-number guard in check modes.
    pub account_number_offset: u64,
    /// Whether the block gas decorator writes `fee / gas` into the context.
    pub publish_gas_prices: bool,
    /// Message type URLs exempt from fee checks when a tx contains only them.
    pub free_message_types: Vec<String>,
    /// Validator-local minimum gas prices, applied during check.
    pub min_gas_prices: DecCoins,
}

impl Default for AnteConfig {
    fn default() -> Self {
        Self {
            account_number_offset: DEFAULT_ACCOUNT_NUMBER_OFFSET,
            publish_gas_prices: true,
            free_message_types: vec![
                MSG_UPDATE_CLIENT_TYPE_URL.to_string(),
                MSG_TIMEOUT_TYPE_URL.to_string(),
                MSG_ACKNOWLEDGEMENT_TYPE_URL.to_string(),
            ],
            min_gas_prices: DecCoins::empty(),
        }
    }
}

impl AnteConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, AnteError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AnteError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ANTE_ACCOUNT_NUMBER_OFFSET`: guard offset (default: 1000000)
    /// - `ANTE_MIN_GAS_PRICES`: e.g. `0.15uinit,0.01uusdc` (default: none)
    /// - `ANTE_PUBLISH_GAS_PRICES`: publish per-gas price (default: true)
    pub fn from_env() -> Result<Self, AnteError> {
        let mut config = Self::default();

        if let Ok(v) = env::var("ANTE_ACCOUNT_NUMBER_OFFSET") {
            config.account_number_offset = v.trim().parse().map_err(|_| {
                AnteError::Configuration(format!("invalid ANTE_ACCOUNT_NUMBER_OFFSET: {v}"))
            })?;
        }
        if let Ok(v) = env::var("ANTE_MIN_GAS_PRICES") {
            config.min_gas_prices = v
                .parse()
                .map_err(|e| AnteError::Configuration(format!("invalid ANTE_MIN_GAS_PRICES: {e}")))?;
        }
        if let Ok(v) = env::var("ANTE_PUBLISH_GAS_PRICES") {
            config.publish_gas_prices = v.to_lowercase() != "false" && v != "0";
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnteError> {
        if self.account_number_offset == 0 {
            return Err(AnteError::Configuration(
                "account_number_offset must be positive".into(),
            ));
        }
        if self.account_number_offset > u64::MAX / 4 {
            return Err(AnteError::Configuration(
                "account_number_offset too large".into(),
            ));
        }
        Ok(())
    }
}

/// Account-module parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthParams {
    pub max_memo_characters: u64,
    pub tx_sig_limit: u64,
    pub tx_size_cost_per_byte: u64,
    pub sig_verify_cost_ed25519: u64,
    pub sig_verify_cost_secp256k1: u64,
}

impl Default for AuthParams {
    fn default() -> Self {
        Self {
            max_memo_characters: 256,
            tx_sig_limit: 7,
            tx_size_cost_per_byte: 10,
            sig_verify_cost_ed25519: 590,
            sig_verify_cost_secp256k1: 1000,
        }
    }
}

impl AuthParams {
    /// Roughly 150% of the secp256k1 cost.
    pub fn sig_verify_cost_secp256r1(&self) -> u64 {
        self.sig_verify_cost_secp256k1.saturating_mul(15) / 10
    }
}
