//! Pricing
//!
//! Authoritative order totals. Callers pass catalog prices, never client-declared ones.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::round_money;

/// Errors that can occur while pricing an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An order needs at least one line.
    #[error("an order needs at least one item")]
    NoItems,

    /// A line was submitted with a zero quantity.
    #[error("item {line} must have a quantity of at least 1")]
    ZeroQuantity {
        /// Zero-based line index.
        line: usize,
    },

    /// A line carried a negative unit price.
    #[error("item {line} has a negative unit price")]
    NegativeUnitPrice {
        /// Zero-based line index.
        line: usize,
    },

    /// Discounts can only reduce a total.
    #[error("coupon discount cannot be negative")]
    NegativeDiscount,

    /// Decimal arithmetic overflowed.
    #[error("order total is too large")]
    Overflow,
}

/// Delivery fee rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPolicy {
    /// Subtotals at or above this amount ship for free.
    pub free_delivery_threshold: Decimal,

    /// Fee charged below the threshold.
    pub delivery_fee: Decimal,
}

impl DeliveryPolicy {
    /// Delivery fee owed for the given subtotal.
    #[must_use]
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_delivery_threshold {
            Decimal::ZERO
        } else {
            round_money(self.delivery_fee)
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            free_delivery_threshold: Decimal::ONE_HUNDRED,
            delivery_fee: Decimal::from(30),
        }
    }
}

/// A quantity at a unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    /// Units ordered.
    pub quantity: u32,

    /// Price per unit in major units.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Creates a new line.
    #[must_use]
    pub const fn new(quantity: u32, unit_price: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
        }
    }

    /// `quantity × unit_price`, rounded to money scale.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the multiplication overflows.
    pub fn line_total(&self) -> Result<Decimal, PricingError> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .map(round_money)
            .ok_or(PricingError::Overflow)
    }
}

/// Computed order pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    /// Sum of all line totals.
    pub subtotal: Decimal,

    /// Delivery surcharge.
    pub delivery_fee: Decimal,

    /// Discount applied from a coupon.
    pub coupon_discount: Decimal,

    /// Amount payable.
    pub total: Decimal,
}

impl Pricing {
    /// Whether nothing is owed, so no money needs to move.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.total <= Decimal::ZERO
    }
}

/// Sum of line totals, validating each line.
///
/// # Errors
///
/// - [`PricingError::NoItems`]: `items` is empty.
/// - [`PricingError::ZeroQuantity`] / [`PricingError::NegativeUnitPrice`]: invalid line.
/// - [`PricingError::Overflow`]: arithmetic overflow.
pub fn subtotal(items: &[LineItem]) -> Result<Decimal, PricingError> {
    if items.is_empty() {
        return Err(PricingError::NoItems);
    }

    items
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |acc, (line, item)| {
            if item.quantity == 0 {
                return Err(PricingError::ZeroQuantity { line });
            }

            if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
                return Err(PricingError::NegativeUnitPrice { line });
            }

            acc.checked_add(item.line_total()?)
                .ok_or(PricingError::Overflow)
        })
}

/// Subtotal plus the delivery fee it attracts. Coupons are evaluated against this amount.
///
/// # Errors
///
/// Propagates [`subtotal`] errors and returns [`PricingError::Overflow`] if the sum overflows.
pub fn chargeable_amount(items: &[LineItem], policy: &DeliveryPolicy) -> Result<Decimal, PricingError> {
    let subtotal = subtotal(items)?;

    subtotal
        .checked_add(policy.fee_for(subtotal))
        .ok_or(PricingError::Overflow)
}

/// Price an order from its lines, the delivery policy and an already validated discount.
///
/// The discount is clamped so the total never drops below zero.
///
/// # Errors
///
/// Propagates [`subtotal`] errors and rejects negative discounts.
pub fn price_order(
    items: &[LineItem],
    policy: &DeliveryPolicy,
    coupon_discount: Decimal,
) -> Result<Pricing, PricingError> {
    if coupon_discount.is_sign_negative() && !coupon_discount.is_zero() {
        return Err(PricingError::NegativeDiscount);
    }

    let subtotal = subtotal(items)?;
    let delivery_fee = policy.fee_for(subtotal);

    let gross = subtotal
        .checked_add(delivery_fee)
        .ok_or(PricingError::Overflow)?;

    let coupon_discount = round_money(coupon_discount).min(gross);

    Ok(Pricing {
        subtotal,
        delivery_fee,
        coupon_discount,
        total: gross - coupon_discount,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn free_delivery_at_threshold() -> TestResult {
        let pricing = price_order(
            &[LineItem::new(2, dec!(50))],
            &DeliveryPolicy::default(),
            Decimal::ZERO,
        )?;

        assert_eq!(pricing.subtotal, dec!(100));
        assert_eq!(pricing.delivery_fee, Decimal::ZERO);
        assert_eq!(pricing.total, dec!(100));

        Ok(())
    }

    #[test]
    fn delivery_fee_below_threshold() -> TestResult {
        let pricing = price_order(
            &[LineItem::new(1, dec!(99.99))],
            &DeliveryPolicy::default(),
            Decimal::ZERO,
        )?;

        assert_eq!(pricing.delivery_fee, dec!(30));
        assert_eq!(pricing.total, dec!(129.99));

        Ok(())
    }

    #[test]
    fn custom_policy_is_respected() -> TestResult {
        let policy = DeliveryPolicy {
            free_delivery_threshold: dec!(250),
            delivery_fee: dec!(15),
        };

        let pricing = price_order(&[LineItem::new(4, dec!(50))], &policy, Decimal::ZERO)?;

        assert_eq!(pricing.delivery_fee, dec!(15));
        assert_eq!(pricing.total, dec!(215));

        Ok(())
    }

    #[test]
    fn discount_is_clamped_to_gross() -> TestResult {
        let pricing = price_order(
            &[LineItem::new(1, dec!(10))],
            &DeliveryPolicy::default(),
            dec!(500),
        )?;

        assert_eq!(pricing.coupon_discount, dec!(40));
        assert_eq!(pricing.total, Decimal::ZERO);
        assert!(pricing.is_free());

        Ok(())
    }

    #[test]
    fn chargeable_amount_includes_the_delivery_fee() -> TestResult {
        let policy = DeliveryPolicy::default();

        assert_eq!(
            chargeable_amount(&[LineItem::new(1, dec!(50))], &policy)?,
            dec!(80)
        );
        assert_eq!(
            chargeable_amount(&[LineItem::new(2, dec!(50))], &policy)?,
            dec!(100)
        );

        Ok(())
    }

    #[test]
    fn full_discount_on_chargeable_amount_zeroes_small_orders() -> TestResult {
        let items = [LineItem::new(1, dec!(50))];
        let policy = DeliveryPolicy::default();

        let pricing = price_order(&items, &policy, chargeable_amount(&items, &policy)?)?;

        assert_eq!(pricing.delivery_fee, dec!(30));
        assert_eq!(pricing.coupon_discount, dec!(80));
        assert_eq!(pricing.total, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn empty_orders_are_rejected() {
        assert_eq!(
            price_order(&[], &DeliveryPolicy::default(), Decimal::ZERO),
            Err(PricingError::NoItems)
        );
    }

    #[test]
    fn zero_quantity_names_the_line() {
        let items = [LineItem::new(1, dec!(10)), LineItem::new(0, dec!(10))];

        assert_eq!(subtotal(&items), Err(PricingError::ZeroQuantity { line: 1 }));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let items = [LineItem::new(1, dec!(-10))];

        assert_eq!(
            subtotal(&items),
            Err(PricingError::NegativeUnitPrice { line: 0 })
        );
    }

    #[test]
    fn negative_discounts_are_rejected() {
        assert_eq!(
            price_order(
                &[LineItem::new(1, dec!(10))],
                &DeliveryPolicy::default(),
                dec!(-5)
            ),
            Err(PricingError::NegativeDiscount)
        );
    }
}
