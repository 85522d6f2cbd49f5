//! Create Guest Order Handler

use std::sync::Arc;

use milkrun_app::domain::orders::data::{Checkout, OrderRequest};
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{CreateOrderRequest, OrderCreatedResponse},
    },
    state::State,
};

/// Create Guest Order Handler
///
/// Places an order without a session. The contact email becomes the customer identity.
#[endpoint(
    tags("guest"),
    summary = "Create Guest Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order"),
        (status_code = StatusCode::FORBIDDEN, description = "Customer account is inactive"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = OrderRequest::try_from(json.into_inner())?;

    let order = state
        .app
        .orders
        .create_order(Checkout::Guest, request)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use milkrun_app::domain::orders::{OrdersServiceError, records::OrderUuid};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_order, order_request_json, public_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        public_service(mocks, Router::with_path("guest/orders").post(handler))
    }

    #[tokio::test]
    async fn test_guest_order_by_name_is_created() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid);

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_create_order()
            .once()
            .withf(|checkout, request| {
                checkout.is_guest()
                    && request
                        .items
                        .first()
                        .is_some_and(|line| line.product.is_none() && line.name.as_deref() == Some("Milk"))
            })
            .return_once(move |_, _| Ok(order));

        let mut request = order_request_json();
        request["items"] = json!([{ "name": "Milk", "quantity": 2 }]);

        let mut res = TestClient::post("http://example.com/guest/orders")
            .json(&request)
            .send(&make_service(mocks))
            .await;

        let body: OrderCreatedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.order_id, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_unresolved_item_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.orders.expect_create_order().once().return_once(|_, _| {
            Err(OrdersServiceError::UnresolvedItem {
                name: "Butter".to_string(),
            })
        });

        let mut request = order_request_json();
        request["items"] = json!([{ "name": "Butter", "quantity": 1 }]);

        let res = TestClient::post("http://example.com/guest/orders")
            .json(&request)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
