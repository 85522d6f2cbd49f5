//! Payment methods and payment status.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{pricing::Pricing, status::OrderStatus};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,

    /// Pre-paid through the payment gateway.
    Online,
}

impl PaymentMethod {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Online => "online",
        }
    }
}

/// Where the money stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing collected yet.
    Pending,

    /// Collected or settled.
    Paid,

    /// Collection failed.
    Failed,

    /// Returned to the customer.
    Refunded,
}

impl PaymentStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Payment state only moves forward.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Paid | Self::Failed) | (Self::Paid, Self::Refunded)
        )
    }
}

/// Unknown payment method or status string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment value: {0}")]
pub struct UnknownPaymentValue(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cod" => Ok(Self::Cod),
            "online" => Ok(Self::Online),
            other => Err(UnknownPaymentValue(other.to_string())),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(UnknownPaymentValue(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state a new order starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPlan {
    /// Cash is collected at the door; the owner confirms the order.
    CollectOnDelivery,

    /// The gateway collects before fulfilment.
    AwaitGateway,

    /// Online order with nothing to pay; settled at creation.
    Settled,
}

impl PaymentPlan {
    /// Choose the plan for a method and priced order.
    #[must_use]
    pub fn for_order(method: PaymentMethod, pricing: &Pricing) -> Self {
        match method {
            PaymentMethod::Cod => Self::CollectOnDelivery,
            PaymentMethod::Online if pricing.is_free() => Self::Settled,
            PaymentMethod::Online => Self::AwaitGateway,
        }
    }

    /// Initial payment status.
    #[must_use]
    pub const fn initial_status(self) -> PaymentStatus {
        match self {
            Self::CollectOnDelivery | Self::AwaitGateway => PaymentStatus::Pending,
            Self::Settled => PaymentStatus::Paid,
        }
    }

    /// Settled orders skip straight to `confirmed`.
    #[must_use]
    pub const fn initial_order_status(self) -> OrderStatus {
        match self {
            Self::CollectOnDelivery | Self::AwaitGateway => OrderStatus::Pending,
            Self::Settled => OrderStatus::Confirmed,
        }
    }
}
