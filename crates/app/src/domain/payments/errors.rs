//! Payments service errors.

use milkrun::{money::MoneyError, status::OrderStatus};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{gateway::GatewayError, store::StoreError};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order is not paid online")]
    NotOnlineOrder,

    #[error("order is {status} and can no longer be paid")]
    NotPayable { status: OrderStatus },

    #[error("order payment is already settled")]
    AlreadySettled,

    #[error("no gateway order has been created for this order")]
    NoGatewayOrder,

    #[error("amount {declared} does not match the order total {expected}")]
    AmountMismatch { expected: Decimal, declared: Decimal },

    #[error("payment signature is invalid")]
    InvalidSignature,

    #[error("order was already paid with a different payment")]
    PaymentConflict,

    #[error("online payments are not available")]
    GatewayUnavailable,

    #[error("payment gateway error")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for PaymentsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
