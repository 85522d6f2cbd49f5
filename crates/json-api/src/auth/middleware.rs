//! Customer session middleware.

use std::sync::Arc;

use milkrun_app::auth::AuthServiceError;
use salvo::prelude::*;
use tracing::error;

use crate::{auth::extract_bearer_token, extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let customer = match state.app.auth.authenticate_bearer(token).await {
        Ok(customer) => customer,
        Err(AuthServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Invalid or expired session"));

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate session token: {source}");

            res.render(StatusError::internal_server_error());

            return;
        }
    };

    depot.insert_customer(customer);

    ctrl.call_next(req, depot, res).await;
}
