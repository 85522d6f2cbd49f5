//! Milkrun Domain Concerns

pub mod catalog;
pub mod coupons;
pub mod customers;
pub mod orders;
pub mod payments;
