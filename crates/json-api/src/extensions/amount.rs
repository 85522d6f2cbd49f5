//! Money amounts travel as decimal strings.

use rust_decimal::Decimal;
use salvo::prelude::StatusError;

use crate::extensions::*;

pub(crate) trait AmountExt {
    /// Parse a non-negative decimal amount, naming `field` on failure.
    fn parse_amount(&self, field: &str) -> Result<Decimal, StatusError>;
}

impl AmountExt for str {
    fn parse_amount(&self, field: &str) -> Result<Decimal, StatusError> {
        let amount = self
            .trim()
            .parse::<Decimal>()
            .or_400(&format!("{field} must be a decimal amount"))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(StatusError::bad_request().brief(format!("{field} cannot be negative")));
        }

        Ok(amount)
    }
}
