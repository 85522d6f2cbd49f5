//! Verify Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use milkrun_app::domain::payments::PaymentVerification;

use crate::{
    extensions::*, orders::models::OrderResponse, payments::errors::into_status_error,
    state::State,
};

/// Verify Payment Request
///
/// The receipt the gateway handed to the client after collecting payment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyPaymentRequest {
    pub order_id: Uuid,
    pub gateway_order_id: String,
    pub payment_id: String,

    /// Hex HMAC-SHA256 of `gatewayOrderId|paymentId`
    pub signature: String,
}

impl From<VerifyPaymentRequest> for PaymentVerification {
    fn from(request: VerifyPaymentRequest) -> Self {
        Self {
            order: request.order_id.into(),
            gateway_order_id: request.gateway_order_id,
            payment_id: request.payment_id,
            signature: request.signature,
        }
    }
}

/// Verify Payment Handler
///
/// Checks the receipt signature and marks the order paid. Safe to retry.
#[endpoint(
    tags("payments"),
    summary = "Verify Payment",
    responses(
        (status_code = StatusCode::OK, description = "Order paid"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid signature"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order cannot be settled"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Online payments unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .payments
        .verify_payment(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
