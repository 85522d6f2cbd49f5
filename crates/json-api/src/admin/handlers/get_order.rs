//! Admin Get Order Handler

use std::sync::Arc;

use milkrun_app::domain::orders::data::OrderViewer;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{into_status_error, models::OrderResponse},
    state::State,
};

/// Admin Get Order Handler
#[endpoint(
    tags("admin"),
    summary = "Get Any Order",
    security(("admin_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order(OrderViewer::Admin, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use milkrun_app::domain::orders::records::OrderUuid;
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_order, public_service};

    use super::*;

    #[tokio::test]
    async fn test_admin_reads_any_order() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid);

        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_get_order()
            .once()
            .withf(move |viewer, u| *viewer == OrderViewer::Admin && *u == uuid)
            .return_once(move |_, _| Ok(order));

        let res = TestClient::get(format!("http://example.com/admin/orders/{uuid}"))
            .send(&public_service(
                mocks,
                Router::with_path("admin/orders/{order}").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
