//! Confirm Guest Cash On Delivery Handler

use std::sync::Arc;

use milkrun_app::domain::orders::data::OrderOwner;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Guest ownership proof
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GuestOwnerRequest {
    /// Email the order was placed with
    pub email: String,
}

/// Confirm Guest COD Handler
#[endpoint(
    tags("guest"),
    summary = "Confirm Guest Cash On Delivery Order",
    responses(
        (status_code = StatusCode::OK, description = "Order confirmed"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order is not awaiting confirmation"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<GuestOwnerRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .confirm_cod(
            OrderOwner::GuestEmail(json.into_inner().email),
            order.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
