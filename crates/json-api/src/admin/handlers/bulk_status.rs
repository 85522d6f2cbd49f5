//! Bulk Order Status Handler

use std::sync::Arc;

use milkrun_app::domain::orders::data::{BulkUpdateFailure, BulkUpdateOutcome, StatusUpdate};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{into_status_error, models::OrderStatusBody},
    state::State,
};

/// Largest batch accepted in one request.
const MAX_BULK_ORDERS: usize = 500;

/// Bulk Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkStatusRequest {
    pub order_ids: Vec<Uuid>,
    pub status: OrderStatusBody,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkFailureBody {
    pub order_id: Uuid,
    pub reason: String,
}

impl From<BulkUpdateFailure> for BulkFailureBody {
    fn from(failure: BulkUpdateFailure) -> Self {
        Self {
            order_id: failure.order.into(),
            reason: failure.reason,
        }
    }
}

/// Bulk Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BulkStatusResponse {
    pub matched_count: u64,
    pub modified_count: u64,
    pub failures: Vec<BulkFailureBody>,
}

impl From<BulkUpdateOutcome> for BulkStatusResponse {
    fn from(outcome: BulkUpdateOutcome) -> Self {
        Self {
            matched_count: outcome.matched_count,
            modified_count: outcome.modified_count,
            failures: outcome.failures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Bulk Status Handler
///
/// Applies one status update to many orders. Each order is checked on its own.
#[endpoint(
    tags("admin"),
    summary = "Bulk Update Order Status",
    security(("admin_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Per-order outcome"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid batch"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<BulkStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<BulkStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.order_ids.is_empty() {
        return Err(StatusError::bad_request().brief("orderIds must not be empty"));
    }

    if request.order_ids.len() > MAX_BULK_ORDERS {
        return Err(StatusError::bad_request()
            .brief(format!("at most {MAX_BULK_ORDERS} orders can be updated at once")));
    }

    let update = StatusUpdate {
        status: request.status.into(),
        notes: request.notes,
        cancellation_reason: request.cancellation_reason,
    };

    let outcome = state
        .app
        .orders
        .bulk_update_status(
            request.order_ids.into_iter().map(Into::into).collect(),
            update,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(outcome.into()))
}
