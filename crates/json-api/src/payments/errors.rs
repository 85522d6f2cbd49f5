//! Payment Errors

use milkrun_app::domain::payments::PaymentsServiceError;
use salvo::http::StatusError;
use tracing::{error, warn};

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => StatusError::not_found().brief(error.to_string()),
        PaymentsServiceError::AmountMismatch { .. } | PaymentsServiceError::InvalidSignature => {
            StatusError::bad_request().brief(error.to_string())
        }
        PaymentsServiceError::NotOnlineOrder
        | PaymentsServiceError::NotPayable { .. }
        | PaymentsServiceError::AlreadySettled
        | PaymentsServiceError::NoGatewayOrder
        | PaymentsServiceError::PaymentConflict => StatusError::conflict().brief(error.to_string()),
        PaymentsServiceError::GatewayUnavailable => {
            StatusError::service_unavailable().brief(error.to_string())
        }
        PaymentsServiceError::Gateway(source) => {
            warn!("payment gateway call failed: {source}");

            StatusError::service_unavailable().brief("Payment gateway is unavailable, please retry")
        }
        PaymentsServiceError::Money(source) => {
            error!("order total cannot be charged: {source}");

            StatusError::internal_server_error()
        }
        PaymentsServiceError::Store(source) => {
            error!("payment storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use milkrun::status::OrderStatus;
    use milkrun_app::gateway::GatewayError;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        let cases = [
            (PaymentsServiceError::NotFound, StatusCode::NOT_FOUND),
            (PaymentsServiceError::InvalidSignature, StatusCode::BAD_REQUEST),
            (
                PaymentsServiceError::NotPayable {
                    status: OrderStatus::Cancelled,
                },
                StatusCode::CONFLICT,
            ),
            (PaymentsServiceError::PaymentConflict, StatusCode::CONFLICT),
            (
                PaymentsServiceError::GatewayUnavailable,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                PaymentsServiceError::Gateway(GatewayError::UnexpectedResponse(
                    "502 Bad Gateway".to_string(),
                )),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            let message = error.to_string();

            assert_eq!(into_status_error(error).code, expected, "{message}");
        }
    }
}
