//! Money type with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits accepted for an amount (cents).
pub const MINOR_UNIT_DIGITS: u32 = 2;

/// Largest amount or balance: 15 integer digits, the range of a
/// `NUMERIC(19,4)` column.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_569_325_055, 23_283_064, 0, false, 2);

/// Reasons an amount is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount is zero.
    #[error("amount must be greater than zero")]
    Zero,

    /// Amount is negative.
    #[error("amount must not be negative, got {0}")]
    Negative(Decimal),

    /// Amount has more fractional digits than the currency allows.
    #[error("amount {0} has more than {MINOR_UNIT_DIGITS} decimal places")]
    TooPrecise(Decimal),

    /// Amount or resulting balance is above [`MAX_AMOUNT`].
    #[error("{0} exceeds the maximum of {MAX_AMOUNT}")]
    TooLarge(Decimal),

    /// Arithmetic left the representable range.
    #[error("amount overflow")]
    Overflow,
}

/// A monetary amount.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
/// Serializes as a decimal string (e.g. `"100.00"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a decimal without validation (balances read from storage).
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Validates an amount supplied for a deposit, withdrawal or transfer.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError` when the amount is not strictly positive, has
    /// more than two decimal places, or is above [`MAX_AMOUNT`].
    pub fn positive(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_zero() {
            return Err(MoneyError::Zero);
        }
        if amount.is_sign_negative() {
            return Err(MoneyError::Negative(amount));
        }
        if amount.normalize().scale() > MINOR_UNIT_DIGITS {
            return Err(MoneyError::TooPrecise(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(MoneyError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the sum is not representable, or
    /// `MoneyError::TooLarge` if it is above [`MAX_AMOUNT`].
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        let sum = self.0.checked_add(other.0).ok_or(MoneyError::Overflow)?;
        if sum > MAX_AMOUNT {
            return Err(MoneyError::TooLarge(sum));
        }
        Ok(Self(sum))
    }

    /// Subtracts `other` from `self`. The result may be negative.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the difference is not representable.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rounded = self.0;
        if rounded.scale() < MINOR_UNIT_DIGITS {
            rounded.rescale(MINOR_UNIT_DIGITS);
        }
        write!(f, "{rounded}")
    }
}
