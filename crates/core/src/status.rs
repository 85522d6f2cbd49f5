//! Order status state machine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, waiting for payment or confirmation.
    Pending,

    /// Accepted for fulfilment.
    Confirmed,

    /// Being packed.
    Preparing,

    /// With the delivery rider.
    OutForDelivery,

    /// Handed over. Terminal.
    Delivered,

    /// Abandoned before dispatch. Terminal.
    Cancelled,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move an order from {from} to {to}")]
pub struct TransitionError {
    /// Current status.
    pub from: OrderStatus,

    /// Requested status.
    pub to: OrderStatus,
}

/// Unknown status string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the order may still be cancelled.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Preparing)
    }

    /// The forward step after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether `self → target` is in the transition table.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        match target {
            Self::Cancelled => self.is_cancellable(),
            _ => self.next() == Some(target),
        }
    }

    /// Validate `self → target`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] for any move outside the transition table, including
    /// same-status updates.
    pub fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownOrderStatus(value.to_string()))
    }
}
