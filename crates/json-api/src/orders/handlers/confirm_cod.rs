//! Confirm Cash On Delivery Handler

use std::sync::Arc;

use milkrun_app::domain::orders::data::OrderOwner;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Confirm COD Handler
///
/// Confirms a pending cash-on-delivery order owned by the signed-in customer.
#[endpoint(
    tags("orders"),
    summary = "Confirm Cash On Delivery Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order confirmed"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order is not awaiting confirmation"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_or_401()?;

    let order = state
        .app
        .orders
        .confirm_cod(OrderOwner::Customer(customer.uuid), order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
