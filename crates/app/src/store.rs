//! Storage seam shared by every service.
//!
//! Each domain module declares a repository trait and [`PgStore`] implements all of them over
//! `PostgreSQL`. Services only see `Arc<dyn Store>`.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    database::Db,
    domain::{
        catalog::CatalogRepository, coupons::CouponsRepository, customers::CustomersRepository,
        orders::OrdersRepository,
    },
    sequences::SequenceRepository,
};

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    /// The coupon's usage ceiling was reached by a concurrent redemption.
    #[error("coupon usage limit reached")]
    CouponExhausted,

    /// A stored value could not be decoded into its domain type.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

/// Every repository the services need.
pub trait Store:
    CatalogRepository + CouponsRepository + CustomersRepository + OrdersRepository + SequenceRepository
{
}

impl<T> Store for T where
    T: CatalogRepository
        + CouponsRepository
        + CustomersRepository
        + OrdersRepository
        + SequenceRepository
{
}

/// `PostgreSQL` implementation of every repository.
#[derive(Debug, Clone)]
pub struct PgStore {
    pub(crate) db: Db,
}

impl PgStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

/// Wrap a decode failure for a column into a [`sqlx::Error`].
pub(crate) fn decode_error<E>(column: &str, source: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}
