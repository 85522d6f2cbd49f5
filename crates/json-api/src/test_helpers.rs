//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, civil::date};
use milkrun::{
    contact::{ContactInfo, CustomerType, DeliveryAddress},
    order_numbers::OrderNumber,
    payments::{PaymentMethod, PaymentStatus},
    pricing::Pricing,
    status::OrderStatus,
};
use milkrun_app::{
    auth::{AdminTokenDigest, AdminTokenError, CustomerIdentity, MockAuthService},
    context::AppContext,
    domain::{
        catalog::ProductUuid,
        coupons::MockCouponsService,
        customers::{CustomerUuid, MockCustomersService},
        orders::{
            MockOrdersService,
            records::{OrderItem, OrderRecord, OrderUuid, PaymentRecord},
        },
        payments::MockPaymentsService,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salvo::{affix_state::inject, prelude::*};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: CustomerIdentity = CustomerIdentity {
    uuid: CustomerUuid::from_uuid(Uuid::nil()),
    is_active: true,
};

/// Raw admin token whose SHA-256 digest is [`ADMIN_TOKEN_SHA256`].
pub(crate) const ADMIN_TOKEN: &str = "admin-test-token";

pub(crate) const ADMIN_TOKEN_SHA256: &str =
    "1d4f144f52846450e02414b4f60277722e181fe96d30a2392aef2a7838a6aeae";

/// Service mocks. A default mock fails the test on any call it was not told to expect.
#[derive(Default)]
pub(crate) struct Mocks {
    pub orders: MockOrdersService,
    pub payments: MockPaymentsService,
    pub coupons: MockCouponsService,
    pub customers: MockCustomersService,
}

pub(crate) fn strict_services() -> Mocks {
    Mocks::default()
}

pub(crate) fn admin_digest() -> Result<AdminTokenDigest, AdminTokenError> {
    AdminTokenDigest::from_hex(ADMIN_TOKEN_SHA256)
}

pub(crate) fn state_with(
    mocks: Mocks,
    auth: MockAuthService,
    admin: Option<AdminTokenDigest>,
) -> Arc<State> {
    let app = AppContext {
        orders: Arc::new(mocks.orders),
        payments: Arc::new(mocks.payments),
        coupons: Arc::new(mocks.coupons),
        customers: Arc::new(mocks.customers),
        auth: Arc::new(auth),
    };

    State::from_app_context(app, admin)
}

pub(crate) fn state_with_auth(mocks: Mocks, auth: MockAuthService) -> Arc<State> {
    state_with(mocks, auth, None)
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_customer(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

/// Routes behind a signed-in [`TEST_CUSTOMER`].
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(mocks, strict_auth_mock())))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Routes with no customer in the depot.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_auth(mocks, strict_auth_mock())))
            .push(route),
    )
}

/// Pending cash-on-delivery order for two bottles of milk owned by [`TEST_CUSTOMER`].
pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        order_number: OrderNumber::from_sequence(1, date(2024, 3, 7)),
        customer_uuid: TEST_CUSTOMER.uuid,
        items: vec![OrderItem {
            product_uuid: Some(ProductUuid::from_uuid(Uuid::nil())),
            name: "Full Cream Milk 1L".to_string(),
            quantity: 2,
            unit_price: dec!(52),
            line_total: dec!(104),
        }],
        customer_type: CustomerType::Outsider,
        hostel: None,
        delivery_address: DeliveryAddress {
            street: "12 Lake Road".to_string(),
            city: "Pune".to_string(),
            postal_code: "411001".to_string(),
            landmark: None,
        },
        contact_info: ContactInfo {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
        },
        pricing: Pricing {
            subtotal: dec!(104),
            delivery_fee: Decimal::ZERO,
            coupon_discount: Decimal::ZERO,
            total: dec!(104),
        },
        coupon_code: None,
        payment: PaymentRecord {
            method: PaymentMethod::Cod,
            status: PaymentStatus::Pending,
            gateway_order_id: None,
            gateway_payment_id: None,
            gateway_signature: None,
            paid_at: None,
        },
        status: OrderStatus::Pending,
        notes: None,
        cancellation_reason: None,
        delivered_at: None,
        cancelled_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// Request body matching [`make_order`].
pub(crate) fn order_request_json() -> Value {
    json!({
        "items": [
            { "product": Uuid::nil(), "quantity": 2, "price": "52" },
        ],
        "customerType": "outsider",
        "deliveryAddress": {
            "street": "12 Lake Road",
            "city": "Pune",
            "postalCode": "411001",
        },
        "contactInfo": {
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
        },
        "paymentMethod": "cod",
    })
}
