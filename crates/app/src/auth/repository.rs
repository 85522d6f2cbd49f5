//! Auth repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    auth::models::{CustomerIdentity, SessionMetadata},
    domain::customers::CustomerUuid,
};

const FIND_SESSION_CUSTOMER_SQL: &str = include_str!("sql/find_session_customer.sql");
const TOUCH_SESSION_SQL: &str = include_str!("sql/touch_session.sql");
const INSERT_SESSION_SQL: &str = include_str!("sql/insert_session.sql");
const REVOKE_SESSION_SQL: &str = include_str!("sql/revoke_session.sql");

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Customer behind a live (unrevoked, unexpired) session.
    pub(crate) async fn find_session_customer(
        &self,
        token_hash: &str,
    ) -> Result<Option<CustomerIdentity>, sqlx::Error> {
        query_as::<Postgres, CustomerIdentity>(FIND_SESSION_CUSTOMER_SQL)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
    }

    /// Store a session for the customer with `email`. `None` when no such customer exists.
    pub(crate) async fn insert_session(
        &self,
        uuid: Uuid,
        token_hash: &str,
        email: &str,
        expires_at: Option<Timestamp>,
    ) -> Result<Option<SessionMetadata>, sqlx::Error> {
        query_as::<Postgres, SessionMetadata>(INSERT_SESSION_SQL)
            .bind(uuid)
            .bind(token_hash)
            .bind(email)
            .bind(expires_at.map(SqlxTimestamp::from))
            .fetch_optional(&self.pool)
            .await
    }

    /// Revoke a live session. Returns `true` if the session was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_session(&self, token_hash: &str) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(REVOKE_SESSION_SQL)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map(|revoked| revoked.is_some())
    }

    pub(crate) async fn touch_session(&self, token_hash: &str) -> Result<(), sqlx::Error> {
        query(TOUCH_SESSION_SQL)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map(|_| ())
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerIdentity {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            is_active: row.try_get("is_active")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SessionMetadata {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            customer_uuid: CustomerUuid::from_uuid(row.try_get::<Uuid, _>("customer_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
