//! Orders Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use milkrun::{
    contact::{ContactInfo, CustomerType, DeliveryAddress},
    order_numbers::OrderNumber,
    payments::{PaymentMethod, PaymentStatus},
    pricing::Pricing,
    status::OrderStatus,
};
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as, types::Json};
use uuid::Uuid;

use crate::{
    domain::{
        coupons::redeem_coupon,
        customers::CustomerUuid,
        orders::records::{
            NewOrderRecord, OrderItem, OrderRecord, OrderUuid, PaymentRecord, PaymentSettlement,
            StatusChange,
        },
    },
    store::{PgStore, StoreError, decode_error},
};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const FIND_ORDER_SQL: &str = include_str!("sql/find_order.sql");
const ATTACH_GATEWAY_ORDER_SQL: &str = include_str!("sql/attach_gateway_order.sql");
const SETTLE_PAYMENT_SQL: &str = include_str!("sql/settle_payment.sql");
const CHANGE_STATUS_SQL: &str = include_str!("sql/change_status.sql");

/// Orders are only ever changed through conditional updates. A `None` from an update means
/// the guard did not match and the caller should re-read.
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Insert an order, redeeming its coupon in the same write.
    ///
    /// Fails with [`StoreError::CouponExhausted`] and persists nothing when the coupon's
    /// usage limit has been reached.
    async fn insert_order(&self, order: NewOrderRecord) -> Result<OrderRecord, StoreError>;

    async fn find_order(&self, order: OrderUuid) -> Result<Option<OrderRecord>, StoreError>;

    /// Attach a gateway order id while the payment is pending and none is attached.
    async fn attach_gateway_order(
        &self,
        order: OrderUuid,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError>;

    /// Mark a pending payment paid and confirm the pending order.
    async fn settle_payment(
        &self,
        order: OrderUuid,
        settlement: PaymentSettlement,
    ) -> Result<Option<OrderRecord>, StoreError>;

    /// Move the order to `change.to` if it is still in `change.from`.
    async fn change_status(
        &self,
        order: OrderUuid,
        change: StatusChange,
    ) -> Result<Option<OrderRecord>, StoreError>;
}

#[async_trait]
impl OrdersRepository for PgStore {
    async fn insert_order(&self, order: NewOrderRecord) -> Result<OrderRecord, StoreError> {
        let mut tx = self.db.begin().await?;

        if let Some(code) = &order.coupon_code {
            redeem_coupon(&mut tx, code).await?;
        }

        let record = query_as::<Postgres, OrderRecord>(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number.as_str())
            .bind(order.customer_uuid.into_uuid())
            .bind(Json(&order.items))
            .bind(order.customer_type.as_str())
            .bind(&order.hostel)
            .bind(Json(&order.delivery_address))
            .bind(Json(&order.contact_info))
            .bind(order.pricing.subtotal)
            .bind(order.pricing.delivery_fee)
            .bind(order.pricing.coupon_discount)
            .bind(order.pricing.total)
            .bind(&order.coupon_code)
            .bind(order.payment.method.as_str())
            .bind(order.payment.status.as_str())
            .bind(order.payment.paid_at.map(SqlxTimestamp::from))
            .bind(order.status.as_str())
            .bind(&order.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_order(&self, order: OrderUuid) -> Result<Option<OrderRecord>, StoreError> {
        Ok(query_as::<Postgres, OrderRecord>(FIND_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn attach_gateway_order(
        &self,
        order: OrderUuid,
        gateway_order_id: &str,
    ) -> Result<Option<OrderRecord>, StoreError> {
        Ok(query_as::<Postgres, OrderRecord>(ATTACH_GATEWAY_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(gateway_order_id)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn settle_payment(
        &self,
        order: OrderUuid,
        settlement: PaymentSettlement,
    ) -> Result<Option<OrderRecord>, StoreError> {
        Ok(query_as::<Postgres, OrderRecord>(SETTLE_PAYMENT_SQL)
            .bind(order.into_uuid())
            .bind(&settlement.gateway_payment_id)
            .bind(&settlement.gateway_signature)
            .bind(SqlxTimestamp::from(settlement.paid_at))
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn change_status(
        &self,
        order: OrderUuid,
        change: StatusChange,
    ) -> Result<Option<OrderRecord>, StoreError> {
        Ok(query_as::<Postgres, OrderRecord>(CHANGE_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(change.from.as_str())
            .bind(change.to.as_str())
            .bind(&change.notes)
            .bind(&change.cancellation_reason)
            .bind(SqlxTimestamp::from(change.at))
            .fetch_optional(self.db.pool())
            .await?)
    }
}

fn parse_column<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.try_get::<String, _>(column)?
        .parse::<T>()
        .map_err(|error| decode_error(column, error))
}

fn timestamp_column(row: &PgRow, column: &str) -> sqlx::Result<Option<jiff::Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(items): Json<Vec<OrderItem>> = row.try_get("items")?;
        let Json(delivery_address): Json<DeliveryAddress> = row.try_get("delivery_address")?;
        let Json(contact_info): Json<ContactInfo> = row.try_get("contact_info")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            order_number: parse_column::<OrderNumber>(row, "order_number")?,
            customer_uuid: CustomerUuid::from_uuid(row.try_get::<Uuid, _>("customer_uuid")?),
            items,
            customer_type: parse_column::<CustomerType>(row, "customer_type")?,
            hostel: row.try_get("hostel")?,
            delivery_address,
            contact_info,
            pricing: Pricing {
                subtotal: row.try_get("subtotal")?,
                delivery_fee: row.try_get("delivery_fee")?,
                coupon_discount: row.try_get("coupon_discount")?,
                total: row.try_get("total")?,
            },
            coupon_code: row.try_get("coupon_code")?,
            payment: PaymentRecord {
                method: parse_column::<PaymentMethod>(row, "payment_method")?,
                status: parse_column::<PaymentStatus>(row, "payment_status")?,
                gateway_order_id: row.try_get("gateway_order_id")?,
                gateway_payment_id: row.try_get("gateway_payment_id")?,
                gateway_signature: row.try_get("gateway_signature")?,
                paid_at: timestamp_column(row, "paid_at")?,
            },
            status: parse_column::<OrderStatus>(row, "status")?,
            notes: row.try_get("notes")?,
            cancellation_reason: row.try_get("cancellation_reason")?,
            delivered_at: timestamp_column(row, "delivered_at")?,
            cancelled_at: timestamp_column(row, "cancelled_at")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
