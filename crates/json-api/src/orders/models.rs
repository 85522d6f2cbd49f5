//! Order request and response bodies.
//!
//! Amounts are decimal strings in major currency units.

use milkrun::{
    contact::{ContactInfo, CustomerType, DeliveryAddress},
    payments::{PaymentMethod, PaymentStatus},
    pricing::Pricing,
    status::OrderStatus,
};
use milkrun_app::domain::orders::{
    data::{OrderLine, OrderRequest},
    records::{OrderItem, OrderRecord},
};
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extensions::*;

/// Whether the customer lives on campus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CustomerTypeBody {
    College,
    Outsider,
}

impl From<CustomerTypeBody> for CustomerType {
    fn from(body: CustomerTypeBody) -> Self {
        match body {
            CustomerTypeBody::College => Self::College,
            CustomerTypeBody::Outsider => Self::Outsider,
        }
    }
}

impl From<CustomerType> for CustomerTypeBody {
    fn from(value: CustomerType) -> Self {
        match value {
            CustomerType::College => Self::College,
            CustomerType::Outsider => Self::Outsider,
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentMethodBody {
    Cod,
    Online,
}

impl From<PaymentMethodBody> for PaymentMethod {
    fn from(body: PaymentMethodBody) -> Self {
        match body {
            PaymentMethodBody::Cod => Self::Cod,
            PaymentMethodBody::Online => Self::Online,
        }
    }
}

impl From<PaymentMethod> for PaymentMethodBody {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cod => Self::Cod,
            PaymentMethod::Online => Self::Online,
        }
    }
}

/// Where the money stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentStatusBody {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl From<PaymentStatus> for PaymentStatusBody {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Failed => Self::Failed,
            PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

/// Fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OrderStatusBody {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl From<OrderStatusBody> for OrderStatus {
    fn from(body: OrderStatusBody) -> Self {
        match body {
            OrderStatusBody::Pending => Self::Pending,
            OrderStatusBody::Confirmed => Self::Confirmed,
            OrderStatusBody::Preparing => Self::Preparing,
            OrderStatusBody::OutForDelivery => Self::OutForDelivery,
            OrderStatusBody::Delivered => Self::Delivered,
            OrderStatusBody::Cancelled => Self::Cancelled,
        }
    }
}

impl From<OrderStatus> for OrderStatusBody {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Confirmed => Self::Confirmed,
            OrderStatus::Preparing => Self::Preparing,
            OrderStatus::OutForDelivery => Self::OutForDelivery,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Requested order line
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderLineBody {
    /// Catalog product; required for signed-in checkouts
    pub product: Option<Uuid>,

    /// Product name; guests may order by name alone
    pub name: Option<String>,

    pub quantity: u32,

    /// Unit price shown to the customer, checked against the catalog
    pub price: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeliveryAddressBody {
    pub street: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub postal_code: String,

    pub landmark: Option<String>,
}

impl From<DeliveryAddressBody> for DeliveryAddress {
    fn from(body: DeliveryAddressBody) -> Self {
        Self {
            street: body.street,
            city: body.city,
            postal_code: body.postal_code,
            landmark: body.landmark,
        }
    }
}

impl From<DeliveryAddress> for DeliveryAddressBody {
    fn from(address: DeliveryAddress) -> Self {
        Self {
            street: address.street,
            city: address.city,
            postal_code: address.postal_code,
            landmark: address.landmark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactInfoBody {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<ContactInfoBody> for ContactInfo {
    fn from(body: ContactInfoBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            phone: body.phone,
        }
    }
}

impl From<ContactInfo> for ContactInfoBody {
    fn from(contact: ContactInfo) -> Self {
        Self {
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

/// Create Order Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    pub items: Vec<OrderLineBody>,
    pub customer_type: CustomerTypeBody,
    pub hostel: Option<String>,
    pub delivery_address: DeliveryAddressBody,
    pub contact_info: ContactInfoBody,
    pub payment_method: PaymentMethodBody,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<CreateOrderRequest> for OrderRequest {
    type Error = StatusError;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        let items = request
            .items
            .into_iter()
            .map(|line| {
                Ok(OrderLine {
                    product: line.product.map(Into::into),
                    name: line.name,
                    quantity: line.quantity,
                    unit_price: line
                        .price
                        .as_deref()
                        .map(|price| price.parse_amount("items.price"))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, StatusError>>()?;

        Ok(Self {
            items,
            customer_type: request.customer_type.into(),
            hostel: request.hostel,
            delivery_address: request.delivery_address.into(),
            contact_info: request.contact_info.into(),
            payment_method: request.payment_method.into(),
            coupon_code: request.coupon_code,
            notes: request.notes,
        })
    }
}

/// Order pricing breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PricingBody {
    pub subtotal: String,
    pub delivery_fee: String,
    pub coupon_discount: String,
    pub total: String,
}

impl From<Pricing> for PricingBody {
    fn from(pricing: Pricing) -> Self {
        Self {
            subtotal: pricing.subtotal.to_string(),
            delivery_fee: pricing.delivery_fee.to_string(),
            coupon_discount: pricing.coupon_discount.to_string(),
            total: pricing.total.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemBody {
    pub product: Option<Uuid>,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<OrderItem> for OrderItemBody {
    fn from(item: OrderItem) -> Self {
        Self {
            product: item.product_uuid.map(Into::into),
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            line_total: item.line_total.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentBody {
    pub method: PaymentMethodBody,
    pub status: PaymentStatusBody,
    pub gateway_order_id: Option<String>,
    pub payment_id: Option<String>,
    pub paid_at: Option<String>,
}

/// Order Created Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderCreatedResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub pricing: PricingBody,
    pub status: OrderStatusBody,
    pub payment_status: PaymentStatusBody,
}

impl From<OrderRecord> for OrderCreatedResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            order_id: order.uuid.into(),
            order_number: order.order_number.into_inner(),
            pricing: order.pricing.into(),
            status: order.status.into(),
            payment_status: order.payment.status.into(),
        }
    }
}

/// Order Response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: OrderStatusBody,
    pub items: Vec<OrderItemBody>,
    pub customer_type: CustomerTypeBody,
    pub hostel: Option<String>,
    pub delivery_address: DeliveryAddressBody,
    pub contact_info: ContactInfoBody,
    pub pricing: PricingBody,
    pub coupon_code: Option<String>,
    pub payment: PaymentBody,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub delivered_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            order_id: order.uuid.into(),
            order_number: order.order_number.into_inner(),
            status: order.status.into(),
            items: order.items.into_iter().map(Into::into).collect(),
            customer_type: order.customer_type.into(),
            hostel: order.hostel,
            delivery_address: order.delivery_address.into(),
            contact_info: order.contact_info.into(),
            pricing: order.pricing.into(),
            coupon_code: order.coupon_code,
            payment: PaymentBody {
                method: order.payment.method.into(),
                status: order.payment.status.into(),
                gateway_order_id: order.payment.gateway_order_id,
                payment_id: order.payment.gateway_payment_id,
                paid_at: order.payment.paid_at.map(|at| at.to_string()),
            },
            notes: order.notes,
            cancellation_reason: order.cancellation_reason,
            delivered_at: order.delivered_at.map(|at| at.to_string()),
            cancelled_at: order.cancelled_at.map(|at| at.to_string()),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
