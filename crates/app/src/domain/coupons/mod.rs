//! Coupons

pub mod errors;
mod repository;
pub mod service;

pub use errors::CouponsServiceError;
pub use repository::CouponsRepository;
pub(crate) use repository::redeem_coupon;
pub use service::*;
