//! In-memory keepers.
//!
//! Each keeper holds its state behind a `parking_lot` lock and charges the
//! flat read/write gas costs against the calling context. `fork()` produces
//! an independent deep copy, standing in for the per-execution state
//! snapshot the host hands to check, simulate and finalize.

use crate::config::AuthParams;
use crate::domain::{
    sha256, AnteError, BaseAccount, Context, READ_COST_FLAT, WRITE_COST_FLAT,
};
use crate::ports::{
    AccountAbstractionKeeper, AccountKeeper, BankKeeper, DynamicFeeKeeper, FeegrantKeeper,
    IbcKeeper,
};
use parking_lot::RwLock;
use shared_types::{address_to_hex, Address, Coins, Dec, Msg, Packet};
use std::collections::{HashMap, HashSet};
use tracing::debug;

// =============================================================================
// ACCOUNTS
// =============================================================================

#[derive(Clone, Debug, Default)]
struct AccountState {
    accounts: HashMap<Address, BaseAccount>,
    next_account_number: u64,
}

pub struct InMemoryAccountKeeper {
    params: AuthParams,
    state: RwLock<AccountState>,
}

impl InMemoryAccountKeeper {
    pub fn new(params: AuthParams) -> Self {
        Self {
            params,
            state: RwLock::new(AccountState::default()),
        }
    }

    /// Independent copy of the current state.
    pub fn fork(&self) -> Self {
        Self {
            params: self.params.clone(),
            state: RwLock::new(self.state.read().clone()),
        }
    }

    /// Stores an account directly, keeping the counter ahead of its number.
    pub fn insert_account(&self, account: BaseAccount) {
        let mut state = self.state.write();
        state.next_account_number = state
            .next_account_number
            .max(account.account_number.saturating_add(1));
        state.accounts.insert(account.address, account);
    }

    pub fn account(&self, address: &Address) -> Option<BaseAccount> {
        self.state.read().accounts.get(address).cloned()
    }

    pub fn next_number(&self) -> u64 {
        self.state.read().next_account_number
    }

    pub fn set_next_number(&self, next: u64) {
        self.state.write().next_account_number = next;
    }

    pub fn len(&self) -> usize {
        self.state.read().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountKeeper for InMemoryAccountKeeper {
    fn params(&self) -> AuthParams {
        self.params.clone()
    }

    fn get_account(
        &self,
        ctx: &mut Context,
        address: &Address,
    ) -> Result<Option<BaseAccount>, AnteError> {
        ctx.consume_gas(READ_COST_FLAT, "read account")?;
        Ok(self.account(address))
    }

    fn set_account(&self, ctx: &mut Context, account: BaseAccount) -> Result<(), AnteError> {
        ctx.consume_gas(WRITE_COST_FLAT, "write account")?;
        self.state.write().accounts.insert(account.address, account);
        Ok(())
    }

    fn new_account_with_address(
        &self,
        ctx: &mut Context,
        address: &Address,
    ) -> Result<BaseAccount, AnteError> {
        let number = self.peek_next_account_number(ctx)?;
        let next = number
            .checked_add(1)
            .ok_or_else(|| AnteError::Keeper("account number overflow".into()))?;
        self.set_next_account_number(ctx, next)?;
        Ok(BaseAccount::new(*address, number))
    }

    fn peek_next_account_number(&self, ctx: &mut Context) -> Result<u64, AnteError> {
        ctx.consume_gas(READ_COST_FLAT, "read account number")?;
        Ok(self.next_number())
    }

    fn set_next_account_number(&self, ctx: &mut Context, next: u64) -> Result<(), AnteError> {
        ctx.consume_gas(WRITE_COST_FLAT, "write account number")?;
        self.set_next_number(next);
        Ok(())
    }
}

/// Deterministic address of a module account.
pub fn module_address(name: &str) -> Address {
    let hash = sha256(format!("module:{name}").as_bytes());
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[..20]);
    address
}

// =============================================================================
// BANK
// =============================================================================

#[derive(Clone, Debug, Default)]
struct BankState {
    balances: HashMap<Address, Coins>,
}

#[derive(Default)]
pub struct InMemoryBankKeeper {
    state: RwLock<BankState>,
}

impl InMemoryBankKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fork(&self) -> Self {
        Self {
            state: RwLock::new(self.state.read().clone()),
        }
    }

    pub fn set_balance(&self, address: Address, coins: Coins) {
        self.state.write().balances.insert(address, coins);
    }

    pub fn balance(&self, address: &Address) -> Coins {
        self.state
            .read()
            .balances
            .get(address)
            .cloned()
            .unwrap_or_default()
    }

    pub fn module_balance(&self, module: &str) -> Coins {
        self.balance(&module_address(module))
    }
}

impl BankKeeper for InMemoryBankKeeper {
    fn send_coins_from_account_to_module(
        &self,
        ctx: &mut Context,
        from: &Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), AnteError> {
        ctx.consume_gas(READ_COST_FLAT, "read balance")?;
        let to = module_address(module);
        let mut state = self.state.write();

        let held = state.balances.get(from).cloned().unwrap_or_default();
        let remaining = held.checked_sub(amount).ok_or_else(|| {
            AnteError::InsufficientFunds(format!("{} is smaller than {}", display(&held), amount))
        })?;
        let credited = state
            .balances
            .get(&to)
            .cloned()
            .unwrap_or_default()
            .checked_add(amount)
            .map_err(|e| AnteError::Keeper(e.to_string()))?;

        ctx.consume_gas(WRITE_COST_FLAT.saturating_mul(2), "write balance")?;
        state.balances.insert(*from, remaining);
        state.balances.insert(to, credited);
        Ok(())
    }
}

fn display(coins: &Coins) -> String {
    if coins.is_empty() {
        "0".into()
    } else {
        coins.to_string()
    }
}

// =============================================================================
// FEE GRANTS
// =============================================================================

#[derive(Default)]
pub struct InMemoryFeegrantKeeper {
    allowances: RwLock<HashMap<(Address, Address), Coins>>,
}

impl InMemoryFeegrantKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fork(&self) -> Self {
        Self {
            allowances: RwLock::new(self.allowances.read().clone()),
        }
    }

    /// Lets `grantee` spend up to `limit` of `granter`'s funds on fees.
    pub fn grant(&self, granter: Address, grantee: Address, limit: Coins) {
        self.allowances.write().insert((granter, grantee), limit);
    }

    pub fn allowance(&self, granter: &Address, grantee: &Address) -> Option<Coins> {
        self.allowances.read().get(&(*granter, *grantee)).cloned()
    }
}

impl FeegrantKeeper for InMemoryFeegrantKeeper {
    fn use_granted_fees(
        &self,
        ctx: &mut Context,
        granter: &Address,
        grantee: &Address,
        fee: &Coins,
        _msgs: &[Msg],
    ) -> Result<(), AnteError> {
        ctx.consume_gas(READ_COST_FLAT, "read fee allowance")?;
        let key = (*granter, *grantee);
        let mut allowances = self.allowances.write();
        let limit = allowances.get(&key).ok_or_else(|| {
            AnteError::Unauthorized(format!(
                "{} does not allow to pay fees for {}",
                address_to_hex(granter),
                address_to_hex(grantee)
            ))
        })?;
        let remaining = limit
            .checked_sub(fee)
            .ok_or_else(|| AnteError::Unauthorized("fee limit exceeded".into()))?;

        ctx.consume_gas(WRITE_COST_FLAT, "write fee allowance")?;
        if remaining.is_zero() {
            allowances.remove(&key);
        } else {
            allowances.insert(key, remaining);
        }
        Ok(())
    }
}

// =============================================================================
// DYNAMIC FEE
// =============================================================================

/// Parameters of the per-block base gas price adjustment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DynamicFeeParams {
    pub base_denom: String,
    pub base_gas_price: Dec,
    pub min_base_gas_price: Dec,
    pub max_base_gas_price: Dec,
    /// Block gas at which the price holds steady.
    pub target_gas: u64,
    /// Largest relative change per block.
    pub max_change_rate: Dec,
}

impl Default for DynamicFeeParams {
    fn default() -> Self {
        Self {
            base_denom: "uinit".to_string(),
            base_gas_price: Dec::from_ratio(15, 1000).unwrap_or_default(),
            min_base_gas_price: Dec::from_ratio(15, 1000).unwrap_or_default(),
            max_base_gas_price: Dec::from_int(10),
            target_gas: 1_000_000,
            max_change_rate: Dec::from_ratio(1, 10).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug)]
struct DynamicFeeState {
    base_gas_price: Dec,
    accumulated_gas: u64,
    spot_prices: HashMap<String, Dec>,
}

pub struct InMemoryDynamicFeeKeeper {
    params: DynamicFeeParams,
    state: RwLock<DynamicFeeState>,
}

impl InMemoryDynamicFeeKeeper {
    pub fn new(params: DynamicFeeParams) -> Self {
        let state = DynamicFeeState {
            base_gas_price: params.base_gas_price,
            accumulated_gas: 0,
            spot_prices: HashMap::new(),
        };
        Self {
            params,
            state: RwLock::new(state),
        }
    }

    pub fn fork(&self) -> Self {
        Self {
            params: self.params.clone(),
            state: RwLock::new(self.state.read().clone()),
        }
    }

    /// Price of one unit of `denom` in base-denom units.
    pub fn set_spot_price(&self, denom: &str, price: Dec) {
        self.state
            .write()
            .spot_prices
            .insert(denom.to_string(), price);
    }

    pub fn set_base_gas_price(&self, price: Dec) {
        self.state.write().base_gas_price = price;
    }

    pub fn current_base_gas_price(&self) -> Dec {
        self.state.read().base_gas_price
    }

    pub fn accumulated_gas(&self) -> u64 {
        self.state.read().accumulated_gas
    }

    /// Recomputes the base gas price from this block's gas and resets the
    /// total. Returns the new price.
    pub fn end_block(&self) -> Dec {
        let mut state = self.state.write();
        let p = &self.params;
        let current = state.base_gas_price;
        let used = state.accumulated_gas;
        state.accumulated_gas = 0;

        if p.target_gas == 0 {
            return current;
        }

        let distance = used.abs_diff(p.target_gas).min(p.target_gas);
        let ratio = Dec::from_ratio(u128::from(distance), u128::from(p.target_gas))
            .unwrap_or_default();
        let change = current.mul(&p.max_change_rate).mul(&ratio);
        let next = if used >= p.target_gas {
            current.saturating_add(&change)
        } else {
            current.saturating_sub(&change)
        };
        let next = next.max(p.min_base_gas_price).min(p.max_base_gas_price);

        debug!(used, target = p.target_gas, from = %current, to = %next, "base gas price adjusted");
        state.base_gas_price = next;
        next
    }
}

impl DynamicFeeKeeper for InMemoryDynamicFeeKeeper {
    fn base_denom(&self, _ctx: &mut Context) -> Result<String, AnteError> {
        Ok(self.params.base_denom.clone())
    }

    fn base_spot_price(&self, ctx: &mut Context, denom: &str) -> Result<Dec, AnteError> {
        if denom == self.params.base_denom {
            return Ok(Dec::one());
        }
        ctx.consume_gas(READ_COST_FLAT, "read spot price")?;
        Ok(self
            .state
            .read()
            .spot_prices
            .get(denom)
            .copied()
            .unwrap_or_default())
    }

    fn base_gas_price(&self, ctx: &mut Context) -> Result<Dec, AnteError> {
        ctx.consume_gas(READ_COST_FLAT, "read base gas price")?;
        Ok(self.current_base_gas_price())
    }

    fn accumulate_gas(&self, ctx: &mut Context, gas: u64) -> Result<(), AnteError> {
        ctx.consume_gas(READ_COST_FLAT + WRITE_COST_FLAT, "accumulate block gas")?;
        let mut state = self.state.write();
        state.accumulated_gas = state.accumulated_gas.saturating_add(gas);
        Ok(())
    }
}

// =============================================================================
// ACCOUNT ABSTRACTION
// =============================================================================

/// Abstracted accounts authenticated by a registered secret: the signature
/// must be `sha256(secret || sign_bytes)`.
#[derive(Default)]
pub struct InMemoryAccountAbstraction {
    secrets: RwLock<HashMap<Address, Vec<u8>>>,
}

impl InMemoryAccountAbstraction {
    /// Keeper with no abstracted accounts.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, address: Address, secret: Vec<u8>) {
        self.secrets.write().insert(address, secret);
    }

    /// Authenticator the keeper expects for `sign_bytes`.
    pub fn authenticate(secret: &[u8], sign_bytes: &[u8]) -> Vec<u8> {
        let mut preimage = secret.to_vec();
        preimage.extend_from_slice(sign_bytes);
        sha256(&preimage).to_vec()
    }
}

impl AccountAbstractionKeeper for InMemoryAccountAbstraction {
    fn is_abstracted(&self, ctx: &mut Context, address: &Address) -> Result<bool, AnteError> {
        ctx.consume_gas(READ_COST_FLAT, "read abstracted account")?;
        Ok(self.secrets.read().contains_key(address))
    }

    fn verify(
        &self,
        _ctx: &mut Context,
        address: &Address,
        sign_bytes: &[u8],
        signature: &[u8],
    ) -> Result<(), AnteError> {
        let secrets = self.secrets.read();
        let secret = secrets
            .get(address)
            .ok_or_else(|| AnteError::UnknownAddress(address_to_hex(address)))?;
        if Self::authenticate(secret, sign_bytes) != signature {
            return Err(AnteError::Unauthorized(
                "account abstraction authentication failed".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// IBC
// =============================================================================

type PacketKey = (String, String, u64);

#[derive(Clone, Debug, Default)]
struct IbcState {
    /// Keyed by destination port/channel.
    received: HashSet<PacketKey>,
    /// Keyed by source port/channel; set once acknowledged or timed out.
    completed: HashSet<PacketKey>,
}

#[derive(Default)]
pub struct InMemoryIbcKeeper {
    state: RwLock<IbcState>,
}

impl InMemoryIbcKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_received(&self, packet: &Packet) {
        self.state.write().received.insert((
            packet.destination_port.clone(),
            packet.destination_channel.clone(),
            packet.sequence,
        ));
    }

    pub fn mark_completed(&self, packet: &Packet) {
        self.state.write().completed.insert((
            packet.source_port.clone(),
            packet.source_channel.clone(),
            packet.sequence,
        ));
    }
}

impl IbcKeeper for InMemoryIbcKeeper {
    fn is_redundant(&self, ctx: &mut Context, msg: &Msg) -> Result<bool, AnteError> {
        ctx.consume_gas(READ_COST_FLAT, "read packet receipt")?;
        let state = self.state.read();
        let redundant = match msg {
            Msg::RecvPacket { packet, .. } => state.received.contains(&(
                packet.destination_port.clone(),
                packet.destination_channel.clone(),
                packet.sequence,
            )),
            Msg::Acknowledgement { packet, .. }
            | Msg::Timeout { packet, .. }
            | Msg::TimeoutOnClose { packet, .. } => state.completed.contains(&(
                packet.source_port.clone(),
                packet.source_channel.clone(),
                packet.sequence,
            )),
            _ => false,
        };
        Ok(redundant)
    }
}
