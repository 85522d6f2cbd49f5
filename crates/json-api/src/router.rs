//! App Router

use salvo::Router;

use crate::{admin, auth, coupons, healthcheck, observability, orders, payments};

/// Every API route. State and request logging hoops are added by the caller.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::new().hoop(auth::middleware::handler).push(
                Router::with_path("orders").post(orders::create::handler).push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("confirm-cod").post(orders::confirm_cod::handler)),
                ),
            ),
        )
        .push(
            Router::with_path("guest/orders")
                .post(orders::guest_create::handler)
                .push(
                    Router::with_path("{order}/confirm-cod")
                        .post(orders::guest_confirm_cod::handler),
                ),
        )
        .push(
            Router::with_path("payments")
                .push(
                    Router::with_path("gateway-orders")
                        .post(payments::create_gateway_order::handler),
                )
                .push(Router::with_path("verify").post(payments::verify::handler)),
        )
        .push(Router::with_path("coupons/validate").post(coupons::validate::handler))
        .push(
            Router::with_path("admin/orders")
                .hoop(auth::admin::handler)
                .push(Router::with_path("bulk-status").post(admin::bulk_status::handler))
                .push(
                    Router::with_path("{order}")
                        .get(admin::get_order::handler)
                        .push(Router::with_path("status").patch(admin::update_status::handler)),
                ),
        )
}
