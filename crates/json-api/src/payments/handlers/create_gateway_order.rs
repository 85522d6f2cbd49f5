//! Create Gateway Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use milkrun_app::domain::payments::GatewayOrder;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Create Gateway Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateGatewayOrderRequest {
    pub order_id: Uuid,

    /// Amount the client expects to pay; must equal the order total when given
    pub amount: Option<String>,
}

/// Gateway Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GatewayOrderResponse {
    pub order_id: Uuid,
    pub gateway_order_id: String,

    /// Order total in major units
    pub amount: String,

    /// Amount the gateway collects, in minor units
    pub amount_minor: u64,
    pub currency: String,
}

impl From<GatewayOrder> for GatewayOrderResponse {
    fn from(order: GatewayOrder) -> Self {
        Self {
            order_id: order.order.into(),
            gateway_order_id: order.gateway_order_id,
            amount: order.amount.to_string(),
            amount_minor: order.amount_minor,
            currency: order.currency,
        }
    }
}

/// Create Gateway Order Handler
///
/// Creates, or returns the existing, gateway order for a pending online order.
#[endpoint(
    tags("payments"),
    summary = "Create Gateway Order",
    responses(
        (status_code = StatusCode::OK, description = "Gateway order"),
        (status_code = StatusCode::BAD_REQUEST, description = "Amount does not match the order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order cannot be paid online"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Payment gateway unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateGatewayOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<GatewayOrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let declared = request
        .amount
        .as_deref()
        .map(|amount| amount.parse_amount("amount"))
        .transpose()?;

    let gateway_order = state
        .app
        .payments
        .create_gateway_order(request.order_id.into(), declared)
        .await
        .map_err(into_status_error)?;

    Ok(Json(gateway_order.into()))
}
