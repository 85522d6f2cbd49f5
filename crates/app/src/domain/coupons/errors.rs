//! Coupons service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("order amount cannot be negative")]
    NegativeAmount,

    #[error("storage error")]
    Store(#[from] StoreError),
}
