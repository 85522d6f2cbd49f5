//! Customers service errors.

use milkrun::contact::ContactError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CustomersServiceError {
    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("customer not found")]
    NotFound,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for CustomersServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
