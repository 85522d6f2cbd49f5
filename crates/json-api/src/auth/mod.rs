//! Authentication

pub(crate) mod admin;
mod bearer;
pub(crate) mod middleware;

pub(crate) use bearer::extract_bearer_token;
