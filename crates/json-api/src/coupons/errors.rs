//! Coupon Errors

use milkrun_app::domain::coupons::CouponsServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::NegativeAmount => StatusError::bad_request().brief(error.to_string()),
        CouponsServiceError::Store(source) => {
            error!("failed to look up coupon: {source}");

            StatusError::internal_server_error()
        }
    }
}
