//! Orders service errors.

use milkrun::{
    contact::ContactError,
    coupons::CouponRejection,
    payments::PaymentStatus,
    pricing::PricingError,
    status::{OrderStatus, TransitionError},
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Coupon(#[from] CouponRejection),

    #[error("item {line} must reference a product")]
    ProductReferenceRequired { line: usize },

    #[error("item {line} references a product that does not exist")]
    ProductNotFound { line: usize },

    #[error("{name} is currently unavailable")]
    ProductUnavailable { name: String },

    #[error("no product matches \"{name}\"")]
    UnresolvedItem { name: String },

    #[error("the price of {name} has changed from {declared} to {current}")]
    PriceMismatch {
        name: String,
        declared: Decimal,
        current: Decimal,
    },

    #[error("customer account is inactive")]
    InactiveCustomer,

    #[error("order not found")]
    NotFound,

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("a cancellation reason is required")]
    CancellationReasonRequired,

    #[error("order is not paid cash on delivery")]
    NotCashOnDelivery,

    #[error("order is {status} with payment {payment}, not awaiting confirmation")]
    NotAwaitingConfirmation {
        status: OrderStatus,
        payment: PaymentStatus,
    },

    #[error("order was modified concurrently")]
    ConcurrentModification,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for OrdersServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::CouponExhausted => Self::Coupon(CouponRejection::UsageLimitReached),
            other => Self::Store(other),
        }
    }
}

impl OrdersServiceError {
    /// Whether the caller sent something that can never succeed as-is.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Contact(_)
                | Self::Pricing(_)
                | Self::Coupon(_)
                | Self::ProductReferenceRequired { .. }
                | Self::ProductUnavailable { .. }
                | Self::UnresolvedItem { .. }
                | Self::PriceMismatch { .. }
                | Self::CancellationReasonRequired
        )
    }
}
