//! # Fixed-Point Decimal
//!
//! 18-decimal fixed-point number used for prices (spot prices, gas prices,
//! minimum gas prices). The raw value is `value * 10^18` stored in a `U256`,
//! so multiplying any `u128` amount by a price cannot overflow.
//!
//! Rounding is always explicit: callers choose `mul_int_truncate` when
//! converting a fee into another unit and `mul_int_ceil` when computing a
//! required fee.

use crate::errors::CoinError;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by [`Dec`].
pub const DEC_PRECISION: usize = 18;

fn precision_multiplier() -> U256 {
    U256::exp10(DEC_PRECISION)
}

fn saturating_u128(value: U256) -> u128 {
    if value > U256::from(u128::MAX) {
        u128::MAX
    } else {
        value.as_u128()
    }
}

/// Fixed-point decimal with 18 fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(U256);

impl Dec {
    /// The value `0`.
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// The value `1`.
    pub fn one() -> Self {
        Self(precision_multiplier())
    }

    /// Creates a decimal from an integer.
    pub fn from_int(value: u128) -> Self {
        Self(U256::from(value) * precision_multiplier())
    }

    /// Creates `numerator / denominator`, truncated to 18 digits.
    ///
    /// Returns `None` when the denominator is zero.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        Some(Self(
            U256::from(numerator) * precision_multiplier() / U256::from(denominator),
        ))
    }

    /// Wraps an already-scaled raw value.
    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// The scaled raw value (`value * 10^18`).
    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.0.is_zero()
    }

    /// Integer part, saturating at `u128::MAX`.
    pub fn truncate_int(&self) -> u128 {
        saturating_u128(self.0 / precision_multiplier())
    }

    /// `floor(self * amount)`, saturating at `u128::MAX`.
    pub fn mul_int_truncate(&self, amount: u128) -> u128 {
        match self.0.checked_mul(U256::from(amount)) {
            Some(product) => saturating_u128(product / precision_multiplier()),
            None => u128::MAX,
        }
    }

    /// `ceil(self * amount)`, saturating at `u128::MAX`.
    pub fn mul_int_ceil(&self, amount: u128) -> u128 {
        match self.0.checked_mul(U256::from(amount)) {
            Some(product) => {
                let (quotient, remainder) = product.div_mod(precision_multiplier());
                if remainder.is_zero() {
                    saturating_u128(quotient)
                } else {
                    saturating_u128(quotient.saturating_add(U256::one()))
                }
            }
            None => u128::MAX,
        }
    }

    /// `self * other`, truncated, saturating at the `U256` ceiling.
    pub fn mul(&self, other: &Dec) -> Dec {
        match self.0.checked_mul(other.0) {
            Some(product) => Dec(product / precision_multiplier()),
            None => Dec(U256::MAX),
        }
    }

    /// `self / divisor`, truncated. `None` for a zero divisor.
    pub fn quo_int(&self, divisor: u128) -> Option<Dec> {
        if divisor == 0 {
            return None;
        }
        Some(Dec(self.0 / U256::from(divisor)))
    }

    pub fn saturating_add(&self, other: &Dec) -> Dec {
        Dec(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(&self, other: &Dec) -> Dec {
        Dec(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (integer, fraction) = self.0.div_mod(precision_multiplier());
        write!(f, "{}.{:0>18}", integer, fraction.to_string())
    }
}

impl FromStr for Dec {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (integer, fraction) = s.split_once('.').unwrap_or((s, ""));

        if integer.is_empty() || fraction.len() > DEC_PRECISION {
            return Err(CoinError::InvalidDecimal(s.to_string()));
        }
        if !integer.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(CoinError::InvalidDecimal(s.to_string()));
        }

        let scaled = format!("{}{:0<18}", integer, fraction);
        U256::from_dec_str(&scaled)
            .map(Dec)
            .map_err(|_| CoinError::InvalidDecimal(s.to_string()))
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
