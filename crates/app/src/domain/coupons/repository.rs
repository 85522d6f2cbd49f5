//! Coupons Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use milkrun::coupons::{Coupon, DiscountKind};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::store::{PgStore, StoreError, decode_error};

const FIND_COUPON_SQL: &str = include_str!("sql/find_coupon.sql");
const REDEEM_COUPON_SQL: &str = include_str!("sql/redeem_coupon.sql");

#[async_trait]
pub trait CouponsRepository: Send + Sync {
    /// Look a coupon up by its normalised code.
    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, StoreError>;
}

#[async_trait]
impl CouponsRepository for PgStore {
    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, StoreError> {
        Ok(query_as::<Postgres, CouponRow>(FIND_COUPON_SQL)
            .bind(code)
            .fetch_optional(self.db.pool())
            .await?
            .map(|row| row.0))
    }
}

/// Count one redemption, guarded by the usage limit.
///
/// Runs inside the order insert transaction so a lost race persists nothing.
pub(crate) async fn redeem_coupon(
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
) -> Result<(), StoreError> {
    let rows_affected = query(REDEEM_COUPON_SQL)
        .bind(code)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(StoreError::CouponExhausted);
    }

    Ok(())
}

struct CouponRow(Coupon);

impl<'r> FromRow<'r, PgRow> for CouponRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;
        let usage_limit: Option<i32> = row.try_get("usage_limit")?;
        let used_count: i32 = row.try_get("used_count")?;

        Ok(Self(Coupon {
            code: row.try_get("code")?,
            kind: kind
                .parse::<DiscountKind>()
                .map_err(|error| decode_error("kind", error))?,
            value: row.try_get("value")?,
            min_order_amount: row.try_get("min_order_amount")?,
            max_discount: row.try_get("max_discount")?,
            valid_from: row.try_get::<SqlxTimestamp, _>("valid_from")?.to_jiff(),
            valid_until: row.try_get::<SqlxTimestamp, _>("valid_until")?.to_jiff(),
            usage_limit: usage_limit
                .map(u32::try_from)
                .transpose()
                .map_err(|error| decode_error("usage_limit", error))?,
            used_count: u32::try_from(used_count)
                .map_err(|error| decode_error("used_count", error))?,
            is_active: row.try_get("is_active")?,
            description: row.try_get("description")?,
        }))
    }
}
