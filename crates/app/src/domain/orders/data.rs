//! Orders Data

use milkrun::{
    contact::{ContactInfo, CustomerType, DeliveryAddress},
    payments::PaymentMethod,
    pricing::DeliveryPolicy,
    status::OrderStatus,
};
use rust_decimal::Decimal;

use crate::{
    auth::CustomerIdentity,
    domain::{
        catalog::ProductUuid,
        customers::CustomerUuid,
        orders::records::OrderUuid,
    },
};

/// Pricing knobs applied to every new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSettings {
    pub delivery: DeliveryPolicy,

    /// Largest accepted gap between a client-declared unit price and the catalog price.
    pub price_tolerance: Decimal,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            delivery: DeliveryPolicy::default(),
            price_tolerance: Decimal::new(1, 2),
        }
    }
}

/// One requested line. Authenticated checkouts must reference a product; guests may name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product: Option<ProductUuid>,
    pub name: Option<String>,
    pub quantity: u32,

    /// Price the client showed the customer. Checked against the catalog, never charged.
    pub unit_price: Option<Decimal>,
}

/// Everything needed to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub customer_type: CustomerType,
    pub hostel: Option<String>,
    pub delivery_address: DeliveryAddress,
    pub contact_info: ContactInfo,
    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

/// Who is checking out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkout {
    /// Signed-in customer from a trusted session.
    Authenticated(CustomerIdentity),

    /// Anonymous checkout; identity comes from the contact email.
    Guest,
}

impl Checkout {
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

/// Who is reading an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderViewer {
    Customer(CustomerUuid),
    Admin,
}

/// Who claims to own an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOwner {
    Customer(CustomerUuid),

    /// Guest checkouts prove ownership with the email they ordered with.
    GuestEmail(String),
}

/// Admin status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub notes: Option<String>,

    /// Required when cancelling.
    pub cancellation_reason: Option<String>,
}

/// One order a bulk update could not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUpdateFailure {
    pub order: OrderUuid,
    pub reason: String,
}

/// Result of a bulk status update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkUpdateOutcome {
    /// Orders that exist.
    pub matched_count: u64,

    /// Orders whose status changed.
    pub modified_count: u64,
    pub failures: Vec<BulkUpdateFailure>,
}
