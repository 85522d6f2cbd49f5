//! Order numbers

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix every order number starts with.
pub const ORDER_NUMBER_PREFIX: &str = "MLK";

/// Width the sequence is zero-padded to. Larger sequences simply grow wider.
pub const SEQUENCE_WIDTH: usize = 6;

/// Human-readable order identifier, `MLK-YYYYMMDD-NNNNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

/// Malformed order number.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid order number: {0}")]
pub struct InvalidOrderNumber(pub String);

impl OrderNumber {
    /// Format the order number for a sequence value on a UTC calendar date.
    #[must_use]
    pub fn from_sequence(sequence: u64, date: Date) -> Self {
        Self(format!(
            "{ORDER_NUMBER_PREFIX}-{:04}{:02}{:02}-{sequence:0width$}",
            date.year(),
            date.month(),
            date.day(),
            width = SEQUENCE_WIDTH,
        ))
    }

    /// The formatted number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the formatted string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderNumber {
    type Err = InvalidOrderNumber;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidOrderNumber(value.to_string());

        let mut parts = value.splitn(3, '-');

        let (Some(prefix), Some(date), Some(sequence)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

        if prefix != ORDER_NUMBER_PREFIX
            || date.len() != 8
            || !digits(date)
            || sequence.len() < SEQUENCE_WIDTH
            || !digits(sequence)
        {
            return Err(invalid());
        }

        Ok(Self(value.to_string()))
    }
}
