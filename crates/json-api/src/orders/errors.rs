//! Order Errors

use milkrun_app::domain::orders::OrdersServiceError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    if error.is_validation() {
        let status = StatusError::bad_request().brief(error.to_string());

        return match &error {
            OrdersServiceError::Contact(source) => status.detail(source.field()),
            _ => status,
        };
    }

    match error {
        OrdersServiceError::ProductNotFound { .. } | OrdersServiceError::NotFound => {
            StatusError::not_found().brief(error.to_string())
        }
        OrdersServiceError::InactiveCustomer => StatusError::forbidden().brief(error.to_string()),
        OrdersServiceError::Store(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
        conflict => StatusError::conflict().brief(conflict.to_string()),
    }
}
