//! Coupons service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use milkrun::coupons::{AppliedCoupon, CouponRejection, evaluate, normalize_code};
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    domain::coupons::errors::CouponsServiceError,
    store::{Store, StoreError},
};

/// Outcome of checking a coupon against an order amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CouponValidation {
    Valid(AppliedCoupon),
    Invalid(CouponRejection),
}

/// Look a code up and evaluate it against `order_amount` at `now`.
pub(crate) async fn check_coupon(
    store: &dyn Store,
    code: &str,
    order_amount: Decimal,
    now: Timestamp,
) -> Result<Result<AppliedCoupon, CouponRejection>, StoreError> {
    let code = normalize_code(code);

    if code.is_empty() {
        return Ok(Err(CouponRejection::Unknown));
    }

    let coupon = store.find_coupon(&code).await?;

    Ok(evaluate(coupon.as_ref(), order_amount, now))
}

#[derive(Clone)]
pub struct StoreCouponsService {
    store: Arc<dyn Store>,
}

impl StoreCouponsService {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CouponsService for StoreCouponsService {
    #[tracing::instrument(
        name = "coupons.service.validate_coupon",
        skip(self),
        fields(valid = tracing::field::Empty),
        err
    )]
    async fn validate_coupon(
        &self,
        code: &str,
        order_amount: Decimal,
    ) -> Result<CouponValidation, CouponsServiceError> {
        if order_amount.is_sign_negative() && !order_amount.is_zero() {
            return Err(CouponsServiceError::NegativeAmount);
        }

        let validation =
            match check_coupon(self.store.as_ref(), code, order_amount, Timestamp::now()).await? {
                Ok(applied) => CouponValidation::Valid(applied),
                Err(rejection) => {
                    info!(%rejection, "coupon rejected");

                    CouponValidation::Invalid(rejection)
                }
            };

        tracing::Span::current().record(
            "valid",
            matches!(validation, CouponValidation::Valid(_)),
        );

        Ok(validation)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Check whether a coupon applies to an order amount and what it is worth.
    async fn validate_coupon(
        &self,
        code: &str,
        order_amount: Decimal,
    ) -> Result<CouponValidation, CouponsServiceError>;
}
