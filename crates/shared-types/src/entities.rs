//! # Core Ledger Entities
//!
//! Addresses, integer coins and decimal coins.
//!
//! ## Canonical Form
//!
//! | Type | Ordering | Zero entries | Duplicates |
//! |------|----------|--------------|------------|
//! | `Coins` | sorted by denom | dropped | rejected |
//! | `DecCoins` | sorted by denom | dropped | rejected |

use crate::decimal::Dec;
use crate::errors::CoinError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address.
pub type Address = [u8; 20];

/// Renders an address as `0x`-prefixed lowercase hex.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Validates a denomination: 3 to 128 characters, leading ASCII letter,
/// then letters, digits or one of `/:._-`.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    let mut chars = denom.chars();
    let valid_len = (3..=128).contains(&denom.len());
    let valid_head = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));

    if valid_len && valid_head && valid_tail {
        Ok(())
    } else {
        Err(CoinError::InvalidDenom(denom.to_string()))
    }
}

// =============================================================================
// COINS
// =============================================================================

/// An integer amount of one denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A canonical multiset of coins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Builds a canonical coin set.
    ///
    /// Zero amounts are dropped, entries sorted by denom; invalid or
    /// repeated denominations are rejected.
    pub fn new(coins: Vec<Coin>) -> Result<Self, CoinError> {
        let mut coins: Vec<Coin> = coins.into_iter().filter(|c| c.amount > 0).collect();
        for coin in &coins {
            validate_denom(&coin.denom)?;
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(dup) = coins.windows(2).find(|w| w[0].denom == w[1].denom) {
            return Err(CoinError::DuplicateDenom(dup[0].denom.clone()));
        }
        Ok(Self(coins))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Amount held in `denom`, zero when absent.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|idx| self.0[idx].amount)
            .unwrap_or(0)
    }

    /// True when at least one coin of `other` is matched by a non-zero,
    /// greater-or-equal amount of the same denom in `self`.
    pub fn is_any_gte(&self, other: &Coins) -> bool {
        other.iter().any(|coin| {
            let held = self.amount_of(&coin.denom);
            held > 0 && held >= coin.amount
        })
    }

    pub fn checked_add(&self, other: &Coins) -> Result<Coins, CoinError> {
        let mut merged = self.0.clone();
        for coin in other.iter() {
            match merged.binary_search_by(|c| c.denom.cmp(&coin.denom)) {
                Ok(idx) => {
                    merged[idx].amount = merged[idx]
                        .amount
                        .checked_add(coin.amount)
                        .ok_or_else(|| CoinError::Overflow(coin.denom.clone()))?;
                }
                Err(idx) => merged.insert(idx, coin.clone()),
            }
        }
        Ok(Coins(merged))
    }

    /// `self - other`, or `None` if any denom would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut remaining = self.0.clone();
        for coin in other.iter() {
            let idx = remaining
                .binary_search_by(|c| c.denom.cmp(&coin.denom))
                .ok()?;
            remaining[idx].amount = remaining[idx].amount.checked_sub(coin.amount)?;
        }
        remaining.retain(|c| c.amount > 0);
        Some(Coins(remaining))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Coins::new(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// DECIMAL COINS
// =============================================================================

/// A decimal amount of one denomination, typically a per-gas price.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecCoin {
    pub denom: String,
    pub amount: Dec,
}

impl DecCoin {
    pub fn new(denom: impl Into<String>, amount: Dec) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A canonical set of decimal coins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DecCoin>", into = "Vec<DecCoin>")]
pub struct DecCoins(Vec<DecCoin>);

impl DecCoins {
    pub fn new(coins: Vec<DecCoin>) -> Result<Self, CoinError> {
        let mut coins: Vec<DecCoin> = coins.into_iter().filter(|c| c.amount.is_positive()).collect();
        for coin in &coins {
            validate_denom(&coin.denom)?;
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(dup) = coins.windows(2).find(|w| w[0].denom == w[1].denom) {
            return Err(CoinError::DuplicateDenom(dup[0].denom.clone()));
        }
        Ok(Self(coins))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Per-unit price of `fee` over `gas`; empty when `gas` is zero.
    pub fn from_coins_per_gas(fee: &Coins, gas: u64) -> DecCoins {
        let prices = fee
            .iter()
            .filter_map(|coin| {
                Dec::from_ratio(coin.amount, u128::from(gas))
                    .map(|amount| DecCoin::new(coin.denom.clone(), amount))
            })
            .filter(|c| c.amount.is_positive())
            .collect();
        // Input is already canonical, so sorting and uniqueness hold.
        DecCoins(prices)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecCoin> {
        self.0.iter()
    }

    pub fn amount_of(&self, denom: &str) -> Dec {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|idx| self.0[idx].amount)
            .unwrap_or_default()
    }
}

impl fmt::Display for DecCoins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Parses `"0.15uinit,1uusdc"`.
impl FromStr for DecCoins {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(DecCoins::empty());
        }

        let mut coins = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let split_at = part
                .find(|c: char| c.is_ascii_alphabetic())
                .ok_or_else(|| CoinError::InvalidCoin(part.to_string()))?;
            let (amount, denom) = part.split_at(split_at);
            if amount.is_empty() {
                return Err(CoinError::InvalidCoin(part.to_string()));
            }
            coins.push(DecCoin::new(denom, amount.parse()?));
        }
        DecCoins::new(coins)
    }
}

impl TryFrom<Vec<DecCoin>> for DecCoins {
    type Error = CoinError;

    fn try_from(coins: Vec<DecCoin>) -> Result<Self, Self::Error> {
        DecCoins::new(coins)
    }
}

impl From<DecCoins> for Vec<DecCoin> {
    fn from(coins: DecCoins) -> Self {
        coins.0
    }
}
