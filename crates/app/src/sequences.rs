//! Named monotonic counters.

use async_trait::async_trait;
use sqlx::{Postgres, query_scalar};

use crate::store::{PgStore, StoreError, decode_error};

const NEXT_SEQUENCE_VALUE_SQL: &str = include_str!("sql/next_sequence_value.sql");

/// Sequence backing order numbers.
pub const ORDER_NUMBER_SEQUENCE: &str = "order_number";

#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Atomically increment the named sequence and return the new value.
    ///
    /// A sequence that does not exist yet starts at 1. Values never repeat.
    async fn next_value(&self, name: &str) -> Result<u64, StoreError>;
}

#[async_trait]
impl SequenceRepository for PgStore {
    async fn next_value(&self, name: &str) -> Result<u64, StoreError> {
        let value = query_scalar::<Postgres, i64>(NEXT_SEQUENCE_VALUE_SQL)
            .bind(name)
            .fetch_one(self.db.pool())
            .await?;

        u64::try_from(value).map_err(|error| StoreError::from(decode_error("value", error)))
    }
}
