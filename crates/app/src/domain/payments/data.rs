//! Payments Data

use rust_decimal::Decimal;

use crate::domain::orders::records::OrderUuid;

/// Gateway order attached to a pending online order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    pub order: OrderUuid,
    pub gateway_order_id: String,

    /// Order total in major units.
    pub amount: Decimal,

    /// Amount the gateway will collect, in minor units.
    pub amount_minor: u64,
    pub currency: String,
}

/// Receipt handed back by the client after the gateway collected payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    pub order: OrderUuid,
    pub gateway_order_id: String,
    pub payment_id: String,
    pub signature: String,
}
