//! Order Records

use jiff::Timestamp;
use milkrun::{
    contact::{ContactInfo, CustomerType, DeliveryAddress},
    order_numbers::OrderNumber,
    payments::{PaymentMethod, PaymentStatus},
    pricing::Pricing,
    status::OrderStatus,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{catalog::ProductUuid, customers::CustomerUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Line snapshot taken when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_uuid: Option<ProductUuid>,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Payment state of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub paid_at: Option<Timestamp>,
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub customer_uuid: CustomerUuid,
    pub items: Vec<OrderItem>,
    pub customer_type: CustomerType,
    pub hostel: Option<String>,
    pub delivery_address: DeliveryAddress,
    pub contact_info: ContactInfo,
    pub pricing: Pricing,
    pub coupon_code: Option<String>,
    pub payment: PaymentRecord,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub delivered_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order ready to be inserted. Timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderRecord {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub customer_uuid: CustomerUuid,
    pub items: Vec<OrderItem>,
    pub customer_type: CustomerType,
    pub hostel: Option<String>,
    pub delivery_address: DeliveryAddress,
    pub contact_info: ContactInfo,
    pub pricing: Pricing,

    /// Redeemed in the same write as the insert when present.
    pub coupon_code: Option<String>,
    pub payment: PaymentRecord,
    pub status: OrderStatus,
    pub notes: Option<String>,
}

/// Conditional flip of a pending payment to `paid`, confirming the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSettlement {
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub paid_at: Timestamp,
}

/// Conditional status change, applied only while the order is still in `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub at: Timestamp,
}
