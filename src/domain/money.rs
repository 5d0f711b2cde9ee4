//! Money type
//!
//! Signed currency amount with two fractional digits. Balances may go
//! negative, so unlike a transfer amount there is no sign rule here; the
//! only constraint is that a value must fit the ledger's storage unit
//! (an `i64` count of cents).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fractional digits kept for every amount
const SCALE: u32 = 2;

/// A signed monetary value rounded to cents.
///
/// # Example
/// ```
/// use bank_ledger::domain::Money;
///
/// let amount: Money = "12.345".parse().unwrap();
/// assert_eq!(amount.to_string(), "12.35");
/// assert_eq!(amount.to_cents().unwrap(), 1235);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(Decimal);

/// Errors that can occur when coercing a value into Money
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Amount is out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Round a decimal to cents (half away from zero).
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Build from a stored count of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, SCALE))
    }

    /// Storage representation.
    pub fn to_cents(&self) -> Result<i64, MoneyError> {
        let mut scaled = self.0;
        scaled.rescale(SCALE);
        if scaled.scale() != SCALE {
            return Err(MoneyError::OutOfRange(self.0.to_string()));
        }
        i64::try_from(scaled.mantissa()).map_err(|_| MoneyError::OutOfRange(self.0.to_string()))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Add another amount, failing if the result no longer fits in cents.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        let sum = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| MoneyError::OutOfRange(format!("{} + {}", self, other)))?;
        let sum = Money::new(sum);
        sum.to_cents()?;
        Ok(sum)
    }

    /// Mean of `count` balances summing to `self`, rounded to cents.
    /// An empty set averages to zero.
    pub fn average_over(&self, count: i64) -> Money {
        if count <= 0 {
            return Money::ZERO;
        }
        Money::new(self.0 / Decimal::from(count))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| MoneyError::ParseError(format!("{}: {}", trimmed, e)))?;
        let money = Money::new(decimal);
        money.to_cents()?;
        Ok(money)
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Money::from_str(&value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}
