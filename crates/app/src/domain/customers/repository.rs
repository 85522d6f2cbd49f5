//! Customers Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use milkrun::contact::ContactInfo;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    domain::customers::records::{CustomerRecord, CustomerUuid},
    store::{PgStore, StoreError},
};

const UPSERT_CUSTOMER_SQL: &str = include_str!("sql/upsert_customer.sql");
const FIND_CUSTOMER_SQL: &str = include_str!("sql/find_customer.sql");
const FIND_CUSTOMER_BY_EMAIL_SQL: &str = include_str!("sql/find_customer_by_email.sql");

#[async_trait]
pub trait CustomersRepository: Send + Sync {
    /// Insert a customer for `contact.email`, or return the existing one.
    ///
    /// `contact` must already be normalised. Existing customers keep their stored name
    /// and phone.
    async fn upsert_customer(
        &self,
        uuid: CustomerUuid,
        contact: &ContactInfo,
    ) -> Result<CustomerRecord, StoreError>;

    async fn find_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<Option<CustomerRecord>, StoreError>;

    /// `email` must already be normalised.
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerRecord>, StoreError>;
}

#[async_trait]
impl CustomersRepository for PgStore {
    async fn upsert_customer(
        &self,
        uuid: CustomerUuid,
        contact: &ContactInfo,
    ) -> Result<CustomerRecord, StoreError> {
        Ok(query_as::<Postgres, CustomerRecord>(UPSERT_CUSTOMER_SQL)
            .bind(uuid.into_uuid())
            .bind(&contact.email)
            .bind(&contact.name)
            .bind(&contact.phone)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn find_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<Option<CustomerRecord>, StoreError> {
        Ok(query_as::<Postgres, CustomerRecord>(FIND_CUSTOMER_SQL)
            .bind(customer.into_uuid())
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerRecord>, StoreError> {
        Ok(query_as::<Postgres, CustomerRecord>(FIND_CUSTOMER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?)
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        database::Db,
        test::{TestDb, helpers::contact},
    };

    use super::*;

    async fn store() -> PgStore {
        PgStore::new(Db::new(TestDb::new().await.pool().clone()))
    }

    #[tokio::test]
    async fn upsert_is_keyed_by_email() -> TestResult {
        let store = store().await;

        let first = store.upsert_customer(CustomerUuid::new(), &contact()).await?;
        let second = store.upsert_customer(CustomerUuid::new(), &contact()).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(
            store.find_customer_by_email(&first.email).await?.map(|c| c.uuid),
            Some(first.uuid)
        );
        assert_eq!(
            store.find_customer(first.uuid).await?.map(|c| c.email),
            Some(first.email)
        );

        Ok(())
    }

    #[tokio::test]
    async fn unnormalised_emails_are_refused() -> TestResult {
        let store = store().await;

        let mut shouting = contact();
        shouting.email = "ASHA@example.com".to_string();

        let result = store.upsert_customer(CustomerUuid::new(), &shouting).await;

        assert!(
            matches!(result, Err(StoreError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }
}
