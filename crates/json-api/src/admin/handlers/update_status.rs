//! Update Order Status Handler

use std::sync::Arc;

use milkrun_app::domain::orders::data::StatusUpdate;
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
    orders::{
        into_status_error,
        models::{OrderResponse, OrderStatusBody},
    },
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest {
    pub status: OrderStatusBody,
    pub notes: Option<String>,

    /// Required when cancelling
    pub cancellation_reason: Option<String>,
}

impl From<UpdateStatusRequest> for StatusUpdate {
    fn from(request: UpdateStatusRequest) -> Self {
        Self {
            status: request.status.into(),
            notes: request.notes,
            cancellation_reason: request.cancellation_reason,
        }
    }
}

/// Update Order Status Handler
#[endpoint(
    tags("admin"),
    summary = "Update Order Status",
    security(("admin_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cancellation reason missing"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .update_status(order.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
