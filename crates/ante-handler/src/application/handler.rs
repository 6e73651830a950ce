//! # Ante Handler
//!
//! Assembles the two decorator chains from [`HandlerOptions`] and serves them
//! through [`AnteHandlerApi`].
//!
//! ## Chains
//!
//! | # | Minimal (check / re-check) | Full (simulate / finalize) |
//! |---|----------------------------|----------------------------|
//! | 1 | setup_context | setup_context |
//! | 2 | account_number_guard | account_number_guard |
//! | 3 | extension_options | extension_options |
//! | 4 | block_gas (publishing) | block_gas (`publish_gas_prices`) |
//! | 5 | validate_basic | validate_basic |
//! | 6 | tx_timeout_height | tx_timeout_height |
//! | 7 | validate_memo | validate_memo |
//! | 8 | consume_gas_for_tx_size | consume_gas_for_tx_size |
//! | 9 | check_fee | deduct_fee |
//! | 10 | set_pub_key | set_pub_key |
//! | 11 | validate_sig_count | validate_sig_count |
//! | 12 | sig_gas_consume | sig_gas_consume |
//! | 13 | sig_verification | sig_verification |
//! | 14 | redundant_relay | increment_sequence |
//! | 15 | | redundant_relay |
//! | 16 | | auction decorator, if any |
//!
//! Every step both chains share is the same decorator type, built from the
//! same options.

use crate::config::AnteConfig;
use crate::decorators::{
    AccountNumberGuardDecorator, AnteChain, AnteDecorator, BlockGasDecorator, CheckFeeDecorator,
    ConsumeGasForTxSizeDecorator, DeductFeeDecorator, ExtensionOptionChecker,
    ExtensionOptionsDecorator, IncrementSequenceDecorator, RedundantRelayDecorator,
    SetPubKeyDecorator, SetUpContextDecorator, SigGasConsumeDecorator, SigVerificationDecorator,
    TxTimeoutHeightDecorator, ValidateBasicDecorator, ValidateMemoDecorator,
    ValidateSigCountDecorator,
};
use crate::domain::{
    AnteError, Context, EthSecp256k1GasConsumer, ExecutionMode, FreeMessageFeeChecker,
    MempoolFeeChecker, SignatureGasConsumer, Tx, TxFeeChecker,
};
use crate::ports::{
    AccountAbstractionKeeper, AccountKeeper, AnteHandlerApi, BankKeeper, DynamicFeeKeeper,
    FeegrantKeeper, IbcKeeper, SignModeHandler,
};
use node_telemetry::{ANTE_DURATION, ANTE_REJECTIONS, ANTE_TXS};
use std::sync::Arc;
use tracing::{debug, info, warn};

// =============================================================================
// OPTIONS
// =============================================================================

/// Collaborators and settings the chains are built from.
#[derive(Clone, Default)]
pub struct HandlerOptions {
    pub config: AnteConfig,
    pub account_keeper: Option<Arc<dyn AccountKeeper>>,
    pub bank_keeper: Option<Arc<dyn BankKeeper>>,
    pub feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
    pub sign_mode_handler: Option<Arc<dyn SignModeHandler>>,
    pub dynamic_fee_keeper: Option<Arc<dyn DynamicFeeKeeper>>,
    pub account_abstraction_keeper: Option<Arc<dyn AccountAbstractionKeeper>>,
    pub ibc_keeper: Option<Arc<dyn IbcKeeper>>,
    /// Used by both chains, behind the free-message wrapper built from
    /// `config.free_message_types`. When unset, the full chain falls back to
    /// the mempool checker over the dynamic-fee keeper; the minimal chain has
    /// no fallback.
    pub fee_checker: Option<Arc<dyn TxFeeChecker>>,
    /// Defaults to [`EthSecp256k1GasConsumer`].
    pub sig_gas_consumer: Option<Arc<dyn SignatureGasConsumer>>,
    pub extension_options_checker: Option<ExtensionOptionChecker>,
    /// Appended to the full chain.
    pub auction_decorator: Option<Arc<dyn AnteDecorator>>,
}

impl HandlerOptions {
    pub fn new(config: AnteConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_account_keeper(mut self, keeper: Arc<dyn AccountKeeper>) -> Self {
        self.account_keeper = Some(keeper);
        self
    }

    pub fn with_bank_keeper(mut self, keeper: Arc<dyn BankKeeper>) -> Self {
        self.bank_keeper = Some(keeper);
        self
    }

    pub fn with_feegrant_keeper(mut self, keeper: Arc<dyn FeegrantKeeper>) -> Self {
        self.feegrant_keeper = Some(keeper);
        self
    }

    pub fn with_sign_mode_handler(mut self, handler: Arc<dyn SignModeHandler>) -> Self {
        self.sign_mode_handler = Some(handler);
        self
    }

    pub fn with_dynamic_fee_keeper(mut self, keeper: Arc<dyn DynamicFeeKeeper>) -> Self {
        self.dynamic_fee_keeper = Some(keeper);
        self
    }

    pub fn with_account_abstraction_keeper(
        mut self,
        keeper: Arc<dyn AccountAbstractionKeeper>,
    ) -> Self {
        self.account_abstraction_keeper = Some(keeper);
        self
    }

    pub fn with_ibc_keeper(mut self, keeper: Arc<dyn IbcKeeper>) -> Self {
        self.ibc_keeper = Some(keeper);
        self
    }

    pub fn with_fee_checker(mut self, checker: Arc<dyn TxFeeChecker>) -> Self {
        self.fee_checker = Some(checker);
        self
    }

    pub fn with_sig_gas_consumer(mut self, consumer: Arc<dyn SignatureGasConsumer>) -> Self {
        self.sig_gas_consumer = Some(consumer);
        self
    }

    pub fn with_extension_options_checker(mut self, checker: ExtensionOptionChecker) -> Self {
        self.extension_options_checker = Some(checker);
        self
    }

    pub fn with_auction_decorator(mut self, decorator: Arc<dyn AnteDecorator>) -> Self {
        self.auction_decorator = Some(decorator);
        self
    }

    fn require<T: ?Sized>(field: &Option<Arc<T>>, what: &str) -> Result<Arc<T>, AnteError> {
        field.clone().ok_or_else(|| {
            let err = AnteError::Configuration(format!("{what} is required for ante builder"));
            warn!(error = %err, "ante chain assembly failed");
            err
        })
    }

    fn sig_gas_consumer(&self) -> Arc<dyn SignatureGasConsumer> {
        self.sig_gas_consumer
            .clone()
            .unwrap_or_else(|| Arc::new(EthSecp256k1GasConsumer::new()))
    }

    fn with_free_lane(&self, inner: Arc<dyn TxFeeChecker>) -> Arc<dyn TxFeeChecker> {
        Arc::new(FreeMessageFeeChecker::new(
            inner,
            self.config.free_message_types.iter().cloned(),
        ))
    }
}

// =============================================================================
// ASSEMBLY
// =============================================================================

/// Decorators for check and re-check. Fees are evaluated but never moved and
/// sequences are left alone.
pub fn minimal_decorators(
    options: &HandlerOptions,
) -> Result<Vec<Arc<dyn AnteDecorator>>, AnteError> {
    let account_keeper = HandlerOptions::require(&options.account_keeper, "account keeper")?;
    HandlerOptions::require(&options.bank_keeper, "bank keeper")?;
    let sign_mode_handler =
        HandlerOptions::require(&options.sign_mode_handler, "sign mode handler")?;
    let account_abstraction = HandlerOptions::require(
        &options.account_abstraction_keeper,
        "account abstraction keeper",
    )?;
    let fee_checker =
        options.with_free_lane(HandlerOptions::require(&options.fee_checker, "fee checker")?);

    let decorators: Vec<Arc<dyn AnteDecorator>> = vec![
        Arc::new(SetUpContextDecorator),
        Arc::new(AccountNumberGuardDecorator::new(
            account_keeper.clone(),
            options.config.account_number_offset,
        )),
        Arc::new(ExtensionOptionsDecorator::new(
            options.extension_options_checker.clone(),
        )),
        Arc::new(BlockGasDecorator::new(
            options.dynamic_fee_keeper.clone(),
            true,
        )),
        Arc::new(ValidateBasicDecorator),
        Arc::new(TxTimeoutHeightDecorator),
        Arc::new(ValidateMemoDecorator::new(account_keeper.clone())),
        Arc::new(ConsumeGasForTxSizeDecorator::new(account_keeper.clone())),
        Arc::new(CheckFeeDecorator::new(fee_checker)),
        Arc::new(SetPubKeyDecorator::new(account_keeper.clone())),
        Arc::new(ValidateSigCountDecorator::new(account_keeper.clone())),
        Arc::new(SigGasConsumeDecorator::new(
            account_keeper.clone(),
            options.sig_gas_consumer(),
        )),
        Arc::new(SigVerificationDecorator::new(
            account_keeper,
            sign_mode_handler,
            Some(account_abstraction),
        )),
        Arc::new(RedundantRelayDecorator::new(options.ibc_keeper.clone())),
    ];
    Ok(decorators)
}

/// Decorators for simulate and finalize.
pub fn full_decorators(options: &HandlerOptions) -> Result<Vec<Arc<dyn AnteDecorator>>, AnteError> {
    let account_keeper = HandlerOptions::require(&options.account_keeper, "account keeper")?;
    let bank_keeper = HandlerOptions::require(&options.bank_keeper, "bank keeper")?;
    let sign_mode_handler =
        HandlerOptions::require(&options.sign_mode_handler, "sign mode handler")?;
    let fee_checker = match &options.fee_checker {
        Some(checker) => checker.clone(),
        None => Arc::new(MempoolFeeChecker::new(options.dynamic_fee_keeper.clone())),
    };
    let fee_checker = options.with_free_lane(fee_checker);

    let mut decorators: Vec<Arc<dyn AnteDecorator>> = vec![
        Arc::new(SetUpContextDecorator),
        Arc::new(AccountNumberGuardDecorator::new(
            account_keeper.clone(),
            options.config.account_number_offset,
        )),
        Arc::new(ExtensionOptionsDecorator::new(
            options.extension_options_checker.clone(),
        )),
        Arc::new(BlockGasDecorator::new(
            options.dynamic_fee_keeper.clone(),
            options.config.publish_gas_prices,
        )),
        Arc::new(ValidateBasicDecorator),
        Arc::new(TxTimeoutHeightDecorator),
        Arc::new(ValidateMemoDecorator::new(account_keeper.clone())),
        Arc::new(ConsumeGasForTxSizeDecorator::new(account_keeper.clone())),
        Arc::new(DeductFeeDecorator::new(
            account_keeper.clone(),
            bank_keeper,
            options.feegrant_keeper.clone(),
            fee_checker,
        )),
        Arc::new(SetPubKeyDecorator::new(account_keeper.clone())),
        Arc::new(ValidateSigCountDecorator::new(account_keeper.clone())),
        Arc::new(SigGasConsumeDecorator::new(
            account_keeper.clone(),
            options.sig_gas_consumer(),
        )),
        Arc::new(SigVerificationDecorator::new(
            account_keeper.clone(),
            sign_mode_handler,
            options.account_abstraction_keeper.clone(),
        )),
        Arc::new(IncrementSequenceDecorator::new(account_keeper)),
        Arc::new(RedundantRelayDecorator::new(options.ibc_keeper.clone())),
    ];
    if let Some(auction) = &options.auction_decorator {
        decorators.push(auction.clone());
    }
    Ok(decorators)
}

// =============================================================================
// HANDLER
// =============================================================================

/// Both chains, ready to serve.
#[derive(Clone)]
pub struct AnteHandler {
    config: AnteConfig,
    minimal: AnteChain,
    full: AnteChain,
}

impl AnteHandler {
    /// Validates the config and assembles both chains.
    pub fn new(options: HandlerOptions) -> Result<Self, AnteError> {
        options.config.validate()?;
        let minimal = AnteChain::new(minimal_decorators(&options)?);
        let full = AnteChain::new(full_decorators(&options)?);

        info!(
            minimal = minimal.len(),
            full = full.len(),
            account_number_offset = options.config.account_number_offset,
            publish_gas_prices = options.config.publish_gas_prices,
            "ante chains assembled"
        );

        Ok(Self {
            config: options.config,
            minimal,
            full,
        })
    }

    pub fn config(&self) -> &AnteConfig {
        &self.config
    }

    pub fn minimal_chain(&self) -> &AnteChain {
        &self.minimal
    }

    pub fn full_chain(&self) -> &AnteChain {
        &self.full
    }

    /// Context for one execution, carrying this node's minimum gas prices.
    pub fn new_context(&self, mode: ExecutionMode, chain_id: &str, block_height: u64) -> Context {
        Context::new(mode, chain_id, block_height)
            .with_min_gas_prices(self.config.min_gas_prices.clone())
    }

    fn run_chain(
        &self,
        label: &'static str,
        chain: &AnteChain,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<(), AnteError> {
        let _timer = ANTE_DURATION.with_label_values(&[label]).start_timer();
        let result = chain.run(ctx, tx, simulate);
        match &result {
            Ok(()) => {
                ANTE_TXS.with_label_values(&[label, "accepted"]).inc();
                debug!(chain = label, mode = %ctx.mode(), priority = ctx.priority(), "tx admitted");
            }
            Err(err) => {
                ANTE_TXS.with_label_values(&[label, "rejected"]).inc();
                ANTE_REJECTIONS.with_label_values(&[err.kind().as_str()]).inc();
                debug!(chain = label, mode = %ctx.mode(), error = %err, "tx rejected");
            }
        }
        result
    }
}

impl AnteHandlerApi for AnteHandler {
    fn run_minimal(
        &self,
        ctx: &mut Context,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<(), AnteError> {
        self.run_chain("minimal", &self.minimal, ctx, tx, simulate)
    }

    fn run_full(&self, ctx: &mut Context, tx: &dyn Tx, simulate: bool) -> Result<(), AnteError> {
        self.run_chain("full", &self.full, ctx, tx, simulate)
    }
}
