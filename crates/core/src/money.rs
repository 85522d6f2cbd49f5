//! Money

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Number of decimal places kept for major-unit amounts.
pub const MONEY_SCALE: u32 = 2;

/// Minor units (paise, cents) in one major unit.
pub const MINOR_UNITS_PER_MAJOR: u32 = 100;

/// Errors raised when converting amounts for the payment gateway.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Gateways never collect negative amounts.
    #[error("amount {0} is negative")]
    Negative(Decimal),

    /// Amount does not fit in minor units.
    #[error("amount {0} is too large to convert to minor units")]
    Overflow(Decimal),
}

/// Round a major-unit amount to [`MONEY_SCALE`] places, midpoint away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a major-unit amount into gateway minor units.
///
/// # Errors
///
/// - [`MoneyError::Negative`]: the amount is below zero.
/// - [`MoneyError::Overflow`]: the amount cannot be represented as `u64` minor units.
pub fn to_minor_units(amount: Decimal) -> Result<u64, MoneyError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative(amount));
    }

    round_money(amount)
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .and_then(|minor| minor.to_u64())
        .ok_or(MoneyError::Overflow(amount))
}

/// Convert gateway minor units back into a major-unit amount.
#[must_use]
pub fn from_minor_units(minor: u64) -> Decimal {
    Decimal::from(minor) / Decimal::from(MINOR_UNITS_PER_MAJOR)
}
