//! # Scenario Fixtures
//!
//! A [`Node`] wires every in-memory keeper into an [`AnteHandler`]. `fork()`
//! copies all keeper state and rebuilds the handler over the copy, which is
//! how the host hands check, simulate and finalize their own snapshots.

use ante_handler::adapters::{
    DynamicFeeParams, InMemoryAccountAbstraction, InMemoryAccountKeeper, InMemoryBankKeeper,
    InMemoryDynamicFeeKeeper, InMemoryFeegrantKeeper, InMemoryIbcKeeper,
    Secp256k1SignModeHandler,
};
use ante_handler::domain::{
    keccak256, sha256, BaseAccount, MempoolFeeChecker, PubKey, SignatureV2, SignerData, StdTx,
    Tx,
};
use ante_handler::{
    AnteConfig, AnteDecorator, AnteError, AnteHandler, AnteHandlerApi, AuthParams, Context,
    ExecutionMode, HandlerOptions, TxFeeChecker,
};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey};
use shared_types::{Address, Coin, Coins, Dec, Msg};
use std::sync::Arc;

pub const CHAIN_ID: &str = "ante-test-1";
pub const HEIGHT: u64 = 10;
pub const GAS: u64 = 200_000;
pub const BASE_DENOM: &str = "uinit";

// =============================================================================
// KEYS
// =============================================================================

/// A generated secp256k1 signer.
pub struct TestKey {
    signing_key: SigningKey,
    pub pub_key: PubKey,
    pub address: Address,
}

impl TestKey {
    pub fn secp256k1() -> Self {
        Self::generate(PubKey::Secp256k1)
    }

    pub fn eth_secp256k1() -> Self {
        Self::generate(PubKey::EthSecp256k1)
    }

    fn generate(wrap: fn(Vec<u8>) -> PubKey) -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let point = signing_key.verifying_key().to_encoded_point(true);
        let pub_key = wrap(point.as_bytes().to_vec());
        let address = pub_key.address().expect("generated key derives an address");
        Self {
            signing_key,
            pub_key,
            address,
        }
    }

    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let digest = match self.pub_key {
            PubKey::EthSecp256k1(_) => keccak256(payload),
            _ => sha256(payload),
        };
        let signature: Signature = self
            .signing_key
            .sign_prehash(&digest)
            .expect("prehash signing");
        signature
            .normalize_s()
            .unwrap_or(signature)
            .to_bytes()
            .to_vec()
    }
}

/// Signs `tx` for every `(key, sequence)` pair, in signer order.
pub fn sign(tx: StdTx, signers: &[(&TestKey, u64)], chain_id: &str) -> StdTx {
    let signatures = signers
        .iter()
        .map(|(key, sequence)| {
            let payload = tx
                .sign_bytes(&SignerData {
                    chain_id: chain_id.to_string(),
                    address: key.address,
                    sequence: *sequence,
                })
                .expect("sign bytes");
            SignatureV2 {
                pub_key: Some(key.pub_key.clone()),
                data: key.sign(&payload),
                sequence: *sequence,
            }
        })
        .collect();
    tx.with_signatures(signatures)
}

// =============================================================================
// COINS & MESSAGES
// =============================================================================

pub fn coins(entries: &[(&str, u128)]) -> Coins {
    Coins::new(
        entries
            .iter()
            .map(|(denom, amount)| Coin::new(*denom, *amount))
            .collect(),
    )
    .expect("valid coins")
}

pub fn uinit(amount: u128) -> Coins {
    coins(&[(BASE_DENOM, amount)])
}

pub fn dec(s: &str) -> Dec {
    s.parse().expect("valid decimal")
}

pub fn send(from: &TestKey) -> Msg {
    Msg::Send {
        from_address: from.address,
        to_address: [0xEE; 20],
        amount: uinit(1),
    }
}

pub fn update_client(signer: &TestKey) -> Msg {
    Msg::UpdateClient {
        client_id: "07-tendermint-0".into(),
        signer: signer.address,
    }
}

// =============================================================================
// NODE
// =============================================================================

/// Live price source defaults: 0.01 uinit per gas, 1 uusdc = 2 uinit.
pub fn dynamic_fee_params() -> DynamicFeeParams {
    DynamicFeeParams {
        base_denom: BASE_DENOM.to_string(),
        base_gas_price: dec("0.01"),
        min_base_gas_price: dec("0.001"),
        max_base_gas_price: dec("1"),
        target_gas: 1_000_000,
        max_change_rate: dec("0.1"),
    }
}

pub struct Node {
    pub config: AnteConfig,
    pub accounts: Arc<InMemoryAccountKeeper>,
    pub bank: Arc<InMemoryBankKeeper>,
    pub feegrant: Arc<InMemoryFeegrantKeeper>,
    pub dynamic_fee: Arc<InMemoryDynamicFeeKeeper>,
    pub account_abstraction: Arc<InMemoryAccountAbstraction>,
    pub ibc: Arc<InMemoryIbcKeeper>,
    pub auction: Option<Arc<dyn AnteDecorator>>,
    pub handler: AnteHandler,
}

impl Node {
    pub fn new() -> Self {
        Self::with_config(AnteConfig::default())
    }

    pub fn with_config(config: AnteConfig) -> Self {
        let dynamic_fee = InMemoryDynamicFeeKeeper::new(dynamic_fee_params());
        dynamic_fee.set_spot_price("uusdc", dec("2"));
        Self::assemble(
            config,
            Arc::new(InMemoryAccountKeeper::new(AuthParams::default())),
            Arc::new(InMemoryBankKeeper::new()),
            Arc::new(InMemoryFeegrantKeeper::new()),
            Arc::new(dynamic_fee),
            Arc::new(InMemoryAccountAbstraction::new()),
            Arc::new(InMemoryIbcKeeper::new()),
            None,
        )
    }

    /// Same node with a decorator appended to the full chain.
    pub fn with_auction(self, auction: Arc<dyn AnteDecorator>) -> Self {
        Self::assemble(
            self.config,
            self.accounts,
            self.bank,
            self.feegrant,
            self.dynamic_fee,
            self.account_abstraction,
            self.ibc,
            Some(auction),
        )
    }

    /// Independent snapshot of every keeper.
    pub fn fork(&self) -> Self {
        Self::assemble(
            self.config.clone(),
            Arc::new(self.accounts.fork()),
            Arc::new(self.bank.fork()),
            Arc::new(self.feegrant.fork()),
            Arc::new(self.dynamic_fee.fork()),
            // Registrations are shared configuration, not per-execution state.
            self.account_abstraction.clone(),
            self.ibc.clone(),
            self.auction.clone(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        config: AnteConfig,
        accounts: Arc<InMemoryAccountKeeper>,
        bank: Arc<InMemoryBankKeeper>,
        feegrant: Arc<InMemoryFeegrantKeeper>,
        dynamic_fee: Arc<InMemoryDynamicFeeKeeper>,
        account_abstraction: Arc<InMemoryAccountAbstraction>,
        ibc: Arc<InMemoryIbcKeeper>,
        auction: Option<Arc<dyn AnteDecorator>>,
    ) -> Self {
        // The handler puts its free-message lane in front of this.
        let fee_checker: Arc<dyn TxFeeChecker> =
            Arc::new(MempoolFeeChecker::new(Some(dynamic_fee.clone())));

        let mut options = HandlerOptions::new(config.clone())
            .with_account_keeper(accounts.clone())
            .with_bank_keeper(bank.clone())
            .with_feegrant_keeper(feegrant.clone())
            .with_sign_mode_handler(Arc::new(Secp256k1SignModeHandler))
            .with_dynamic_fee_keeper(dynamic_fee.clone())
            .with_account_abstraction_keeper(account_abstraction.clone())
            .with_ibc_keeper(ibc.clone())
            .with_fee_checker(fee_checker);
        if let Some(auction) = &auction {
            options = options.with_auction_decorator(auction.clone());
        }
        let handler = AnteHandler::new(options).expect("complete handler options");

        Self {
            config,
            accounts,
            bank,
            feegrant,
            dynamic_fee,
            account_abstraction,
            ibc,
            auction,
            handler,
        }
    }

    /// Registers `key` with its pub key set and the given balance.
    pub fn fund(&self, key: &TestKey, balance: Coins) -> BaseAccount {
        let account = BaseAccount {
            pub_key: Some(key.pub_key.clone()),
            ..BaseAccount::new(key.address, self.accounts.next_number())
        };
        self.accounts.insert_account(account.clone());
        self.bank.set_balance(key.address, balance);
        account
    }

    pub fn context(&self, mode: ExecutionMode) -> Context {
        self.handler.new_context(mode, CHAIN_ID, HEIGHT)
    }

    /// Routes `tx` by mode; simulation sets the `simulate` flag.
    pub fn run(&self, mode: ExecutionMode, tx: &dyn Tx) -> (Context, Result<(), AnteError>) {
        let mut ctx = self.context(mode);
        let result = self
            .handler
            .route(&mut ctx, tx, mode == ExecutionMode::Simulate);
        (ctx, result)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
