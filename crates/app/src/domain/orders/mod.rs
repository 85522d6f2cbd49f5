//! Orders

mod builder;
pub mod data;
pub mod errors;
mod numbers;
pub mod records;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use repository::OrdersRepository;
pub use service::*;
