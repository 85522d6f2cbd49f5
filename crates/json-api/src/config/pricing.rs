//! Pricing Config

use clap::Args;
use milkrun_app::context::DEFAULT_CURRENCY;
use rust_decimal::Decimal;

/// Order pricing settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Subtotal at or above which delivery is free
    #[arg(long, env = "FREE_DELIVERY_THRESHOLD", default_value = "100")]
    pub free_delivery_threshold: Decimal,

    /// Delivery fee charged below the free delivery threshold
    #[arg(long, env = "DELIVERY_FEE", default_value = "30")]
    pub delivery_fee: Decimal,

    /// Largest accepted difference between a declared and a catalog unit price
    #[arg(long, env = "PRICE_TOLERANCE", default_value = "0.01")]
    pub price_tolerance: Decimal,

    /// ISO currency code charged at the gateway
    #[arg(long, env = "CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,
}
