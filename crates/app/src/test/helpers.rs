//! Test Helpers

use milkrun::{
    contact::{ContactInfo, CustomerType, DeliveryAddress},
    payments::PaymentMethod,
    signature::sign,
};

use crate::{
    domain::{
        catalog::CatalogProduct,
        orders::{
            data::{OrderLine, OrderRequest},
            records::OrderUuid,
        },
        payments::PaymentVerification,
    },
    test::gateway_secret,
};

pub(crate) fn contact() -> ContactInfo {
    ContactInfo {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
    }
}

pub(crate) fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "12 Lake Road".to_string(),
        city: "Pune".to_string(),
        postal_code: "411001".to_string(),
        landmark: None,
    }
}

/// Line referencing a catalog product at its current price.
pub(crate) fn line(product: &CatalogProduct, quantity: u32) -> OrderLine {
    OrderLine {
        product: Some(product.uuid),
        name: None,
        quantity,
        unit_price: Some(product.price),
    }
}

/// Guest line naming a product instead of referencing it.
pub(crate) fn named_line(name: &str, quantity: u32) -> OrderLine {
    OrderLine {
        product: None,
        name: Some(name.to_string()),
        quantity,
        unit_price: None,
    }
}

pub(crate) fn request(items: Vec<OrderLine>, payment_method: PaymentMethod) -> OrderRequest {
    OrderRequest {
        items,
        customer_type: CustomerType::Outsider,
        hostel: None,
        delivery_address: address(),
        contact_info: contact(),
        payment_method,
        coupon_code: None,
        notes: None,
    }
}

/// Receipt signed with the test gateway secret.
pub(crate) fn signed_receipt(
    order: OrderUuid,
    gateway_order_id: &str,
    payment_id: &str,
) -> PaymentVerification {
    PaymentVerification {
        order,
        gateway_order_id: gateway_order_id.to_string(),
        payment_id: payment_id.to_string(),
        signature: sign(&gateway_secret(), gateway_order_id, payment_id).unwrap_or_default(),
    }
}
