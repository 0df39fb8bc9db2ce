//! Monetary value objects with cent precision.
//!
//! Amounts are held as integer cents so that sums over a catalog are exact.
//! On the wire they are plain JSON decimals (`999.99`).

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// Unit price of a product. Never negative.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price(u64);

/// An aggregate amount (e.g. the stock value of a catalog).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Build a price from a decimal amount, rounding half away from zero to cents.
    pub fn from_decimal(amount: f64) -> Result<Self, DomainError> {
        cents_from_decimal(amount).map(Self)
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Stock value of `quantity` units at this price.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

fn cents_from_decimal(amount: f64) -> Result<u64, DomainError> {
    if !amount.is_finite() {
        return Err(DomainError::validation("amount must be a finite number"));
    }
    if amount < 0.0 {
        return Err(DomainError::validation("amount cannot be negative"));
    }
    let cents = (amount * 100.0).round();
    if cents > u64::MAX as f64 {
        return Err(DomainError::validation("amount is out of range"));
    }
    Ok(cents as u64)
}

fn fmt_cents(cents: u64, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}.{:02}", cents / 100, cents % 100)
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt_cents(self.0, f)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fmt_cents(self.0, f)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: f64 = s
            .trim()
            .trim_start_matches('$')
            .parse()
            .map_err(|_| DomainError::validation(format!("'{s}' is not a valid price")))?;
        Self::from_decimal(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Price::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}
