//! Validate Coupon Handler

use std::sync::Arc;

use milkrun_app::domain::coupons::CouponValidation;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

/// Validate Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateCouponRequest {
    pub code: String,

    /// Order subtotal the coupon would apply to
    pub order_amount: String,
}

/// Coupon Validation Response
///
/// Rejections are a normal answer, not an error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponValidationResponse {
    pub valid: bool,
    pub code: Option<String>,
    pub discount_amount: Option<String>,
    pub description: Option<String>,

    /// Machine-readable rejection reason
    pub reason: Option<String>,

    /// Customer-facing rejection message
    pub message: Option<String>,
}

impl From<CouponValidation> for CouponValidationResponse {
    fn from(validation: CouponValidation) -> Self {
        match validation {
            CouponValidation::Valid(applied) => Self {
                valid: true,
                code: Some(applied.code),
                discount_amount: Some(applied.discount.to_string()),
                description: Some(applied.description),
                reason: None,
                message: None,
            },
            CouponValidation::Invalid(rejection) => Self {
                valid: false,
                code: None,
                discount_amount: None,
                description: None,
                reason: Some(rejection.code().to_string()),
                message: Some(rejection.to_string()),
            },
        }
    }
}

/// Validate Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Validate Coupon",
    responses(
        (status_code = StatusCode::OK, description = "Validation result"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order amount"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let order_amount = request.order_amount.parse_amount("orderAmount")?;

    let validation = state
        .app
        .coupons
        .validate_coupon(&request.code, order_amount)
        .await
        .map_err(into_status_error)?;

    Ok(Json(validation.into()))
}
