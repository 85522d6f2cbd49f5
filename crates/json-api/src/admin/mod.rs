//! Admin order management

mod handlers;

pub(crate) use handlers::*;
