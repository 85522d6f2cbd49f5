//! Coupons

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::round_money;

/// How a coupon computes its discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` percent of the order amount.
    Percentage,

    /// A flat `value` off.
    Fixed,
}

impl DiscountKind {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown discount kind string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown discount kind: {0}")]
pub struct UnknownDiscountKind(pub String);

impl FromStr for DiscountKind {
    type Err = UnknownDiscountKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(UnknownDiscountKind(other.to_string())),
        }
    }
}

/// A named discount rule with eligibility constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Upper-case code customers type in.
    pub code: String,

    /// Discount computation.
    pub kind: DiscountKind,

    /// Percentage points or flat amount, depending on `kind`.
    pub value: Decimal,

    /// Smallest order amount the coupon applies to.
    pub min_order_amount: Decimal,

    /// Upper bound on the discount, if any.
    pub max_discount: Option<Decimal>,

    /// Start of the validity window (inclusive).
    pub valid_from: Timestamp,

    /// End of the validity window (inclusive).
    pub valid_until: Timestamp,

    /// Total redemptions allowed, if limited.
    pub usage_limit: Option<u32>,

    /// Redemptions so far.
    pub used_count: u32,

    /// Disabled coupons never apply.
    pub is_active: bool,

    /// Customer-facing description; generated when absent.
    pub description: Option<String>,
}

/// Why a coupon did not apply.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CouponRejection {
    /// No coupon with that code exists.
    #[error("coupon code is not recognised")]
    Unknown,

    /// The coupon has been switched off.
    #[error("coupon is no longer active")]
    Inactive,

    /// The validity window has not opened yet.
    #[error("coupon is not valid until {valid_from}")]
    NotYetValid {
        /// Window start.
        valid_from: Timestamp,
    },

    /// The validity window has closed.
    #[error("coupon expired at {valid_until}")]
    Expired {
        /// Window end.
        valid_until: Timestamp,
    },

    /// Every redemption has been used.
    #[error("coupon usage limit has been reached")]
    UsageLimitReached,

    /// The order is too small.
    #[error("minimum order amount for this coupon is {minimum}")]
    BelowMinimumOrder {
        /// Required order amount.
        minimum: Decimal,
    },
}

impl CouponRejection {
    /// Stable machine-readable reason, matching the serialized tag.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Inactive => "inactive",
            Self::NotYetValid { .. } => "not_yet_valid",
            Self::Expired { .. } => "expired",
            Self::UsageLimitReached => "usage_limit_reached",
            Self::BelowMinimumOrder { .. } => "below_minimum_order",
        }
    }
}

/// A coupon that applies to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Normalised code.
    pub code: String,

    /// Discount in major units, already capped at the order amount.
    pub discount: Decimal,

    /// Customer-facing description.
    pub description: String,
}

/// Normalise a user-entered code for lookup.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl Coupon {
    /// Check the coupon against an order amount at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`CouponRejection`], checked in the order: active,
    /// window start, window end, usage limit, minimum amount.
    pub fn check_eligibility(
        &self,
        order_amount: Decimal,
        now: Timestamp,
    ) -> Result<(), CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }

        if now < self.valid_from {
            return Err(CouponRejection::NotYetValid {
                valid_from: self.valid_from,
            });
        }

        if now > self.valid_until {
            return Err(CouponRejection::Expired {
                valid_until: self.valid_until,
            });
        }

        if self.is_exhausted() {
            return Err(CouponRejection::UsageLimitReached);
        }

        if order_amount < self.min_order_amount {
            return Err(CouponRejection::BelowMinimumOrder {
                minimum: self.min_order_amount,
            });
        }

        Ok(())
    }

    /// Whether every allowed redemption has been used.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit
            .is_some_and(|limit| self.used_count >= limit)
    }

    /// Discount for an order amount, ignoring eligibility.
    ///
    /// Never exceeds `order_amount`, so a percentage too large to represent is the whole amount.
    #[must_use]
    pub fn discount_for(&self, order_amount: Decimal) -> Decimal {
        let raw = match self.kind {
            DiscountKind::Percentage => order_amount
                .checked_div(Decimal::ONE_HUNDRED)
                .and_then(|hundredth| hundredth.checked_mul(self.value))
                .unwrap_or(order_amount),
            DiscountKind::Fixed => self.value,
        };

        let capped = self
            .max_discount
            .map_or(raw, |max_discount| raw.min(max_discount));

        round_money(capped.min(order_amount).max(Decimal::ZERO))
    }

    /// Customer-facing description, generated from the rule when none is stored.
    #[must_use]
    pub fn describe(&self) -> String {
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            return description.to_string();
        }

        match (self.kind, self.max_discount) {
            (DiscountKind::Percentage, Some(max_discount)) => {
                format!("{}% off, up to {}", self.value.normalize(), max_discount.normalize())
            }
            (DiscountKind::Percentage, None) => format!("{}% off", self.value.normalize()),
            (DiscountKind::Fixed, _) => format!("{} off", self.value.normalize()),
        }
    }
}

/// Decide whether a looked-up coupon applies to an order amount.
///
/// `coupon` is `None` when the code did not match anything.
///
/// # Errors
///
/// Returns the [`CouponRejection`] explaining why the coupon does not apply.
pub fn evaluate(
    coupon: Option<&Coupon>,
    order_amount: Decimal,
    now: Timestamp,
) -> Result<AppliedCoupon, CouponRejection> {
    let coupon = coupon.ok_or(CouponRejection::Unknown)?;

    coupon.check_eligibility(order_amount, now)?;

    Ok(AppliedCoupon {
        code: coupon.code.clone(),
        discount: coupon.discount_for(order_amount),
        description: coupon.describe(),
    })
}
