//! Create Order Handler

use std::sync::Arc;

use milkrun_app::domain::orders::data::{Checkout, OrderRequest};
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{CreateOrderRequest, OrderCreatedResponse},
    },
    state::State,
};

/// Create Order Handler
///
/// Places an order for the signed-in customer. Prices come from the catalog.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order"),
        (status_code = StatusCode::FORBIDDEN, description = "Customer account is inactive"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_or_401()?;
    let request = OrderRequest::try_from(json.into_inner())?;

    let order = state
        .app
        .orders
        .create_order(Checkout::Authenticated(customer), request)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use milkrun::{contact::ContactError, payments::PaymentMethod};
    use milkrun_app::domain::orders::{OrdersServiceError, records::OrderUuid};
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{
        Mocks, TEST_CUSTOMER, customer_service, make_order, order_request_json,
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("orders").post(handler))
    }

    #[tokio::test]
    async fn test_create_order_success() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid);

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_create_order()
            .once()
            .withf(|checkout, request| {
                *checkout == Checkout::Authenticated(TEST_CUSTOMER)
                    && request.payment_method == PaymentMethod::Cod
                    && request.items.len() == 1
                    && request.items.first().and_then(|line| line.unit_price) == Some(dec!(52))
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&order_request_json())
            .send(&make_service(mocks))
            .await;

        let location = res
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        let body: OrderCreatedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}")));
        assert_eq!(body.order_id, uuid.into_uuid());
        assert_eq!(body.order_number, "MLK-20240307-000001");
        assert_eq!(body.pricing.total, "104");

        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_price_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.orders.expect_create_order().never();

        let mut request = order_request_json();
        request["items"][0]["price"] = json!("fifty-two");

        let res = TestClient::post("http://example.com/orders")
            .json(&request)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_validation_error_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Contact(ContactError::InvalidPhone)));

        let res = TestClient::post("http://example.com/orders")
            .json(&order_request_json())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_inactive_customer_returns_403() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::InactiveCustomer));

        let res = TestClient::post("http://example.com/orders")
            .json(&order_request_json())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
