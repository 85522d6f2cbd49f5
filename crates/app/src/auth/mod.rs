//! Authentication

mod admin;
mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use admin::*;
pub use errors::*;
pub use models::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
