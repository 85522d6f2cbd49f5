//! Milkrun
//!
//! Order rules for the milkrun storefront: pricing, coupons, contact validation, payment
//! plans, gateway receipt signatures, the order status state machine and order numbers.
//! Nothing here touches storage or the network.

pub mod contact;
pub mod coupons;
pub mod money;
pub mod order_numbers;
pub mod payments;
pub mod pricing;
pub mod signature;
pub mod status;
