//! Milkrun application services and persistence.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod gateway;
pub mod notifications;
pub mod sequences;
pub mod store;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
