//! State

use std::sync::Arc;

use milkrun_app::{auth::AdminTokenDigest, context::AppContext};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Admin routes answer 403 when unset.
    pub(crate) admin: Option<AdminTokenDigest>,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, admin: Option<AdminTokenDigest>) -> Self {
        Self { app, admin }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, admin: Option<AdminTokenDigest>) -> Arc<Self> {
        Arc::new(Self::new(app, admin))
    }
}
