//! Admin bearer middleware.

use std::sync::Arc;

use salvo::prelude::*;
use tracing::warn;

use crate::{auth::extract_bearer_token, extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);

            return;
        }
    };

    let Some(digest) = state.admin.as_ref() else {
        res.render(StatusError::forbidden().brief("Admin access is not configured"));

        return;
    };

    let authorised = extract_bearer_token(req).is_some_and(|token| digest.verify(token));

    if !authorised {
        warn!(target: "security", path = %req.uri().path(), "rejected admin request");

        res.render(StatusError::unauthorized().brief("Missing or invalid admin token"));

        return;
    }

    ctrl.call_next(req, depot, res).await;
}
