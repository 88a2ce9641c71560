//! Order totals derived from a cart.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::Cart;
use crate::config::PricingConfig;

/// Subtotal, shipping, tax, and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// How far the subtotal is from free shipping; zero once shipping is free
    /// or the cart is empty.
    pub remaining_for_free_shipping: Decimal,
}

impl OrderSummary {
    /// Compute the summary for a cart.
    ///
    /// Shipping is the flat fee unless the subtotal is strictly above the
    /// threshold. An empty cart ships for nothing. Tax is a fraction of the
    /// subtotal, rounded half away from zero to cents.
    #[must_use]
    pub fn for_cart(cart: &Cart, pricing: &PricingConfig) -> Self {
        let subtotal = cart.total();
        let free_shipping = subtotal > pricing.free_shipping_threshold;

        let shipping = if cart.is_empty() || free_shipping {
            Decimal::ZERO
        } else {
            pricing.shipping_flat_fee
        };

        let tax = (subtotal * pricing.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let remaining_for_free_shipping = if cart.is_empty() || free_shipping {
            Decimal::ZERO
        } else {
            pricing.free_shipping_threshold - subtotal
        };

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
            remaining_for_free_shipping,
        }
    }
}

#[cfg(test)]
mod tests {
    use carter_chaos_core::{ProductId, VariantId};

    use super::*;
    use crate::cart::CartItem;

    fn cart_with(lines: &[(i64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (n, (price, quantity)) in lines.iter().enumerate() {
            cart.add_item(CartItem {
                id: ProductId::new(n.to_string()),
                title: "Tee".to_string(),
                variant_id: VariantId::new("default"),
                quantity: *quantity,
                price: Decimal::from(*price),
                image: None,
                size: None,
                color: None,
            });
        }
        cart
    }

    #[test]
    fn test_summary_with_flat_shipping() {
        let summary = OrderSummary::for_cart(&cart_with(&[(10, 2), (5, 1)]), &PricingConfig::default());

        assert_eq!(summary.subtotal, Decimal::from(25));
        assert_eq!(summary.shipping, Decimal::new(999, 2));
        assert_eq!(summary.tax, Decimal::new(200, 2));
        assert_eq!(summary.total, Decimal::new(3699, 2));
        assert_eq!(summary.remaining_for_free_shipping, Decimal::from(75));
    }

    #[test]
    fn test_shipping_free_strictly_above_threshold() {
        let pricing = PricingConfig::default();

        let at_threshold = OrderSummary::for_cart(&cart_with(&[(100, 1)]), &pricing);
        assert_eq!(at_threshold.shipping, Decimal::new(999, 2));

        let above = OrderSummary::for_cart(&cart_with(&[(101, 1)]), &pricing);
        assert_eq!(above.shipping, Decimal::ZERO);
        assert_eq!(above.remaining_for_free_shipping, Decimal::ZERO);
        assert_eq!(above.total, Decimal::new(10908, 2));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let summary = OrderSummary::for_cart(&Cart::new(), &PricingConfig::default());
        assert_eq!(summary.total, Decimal::ZERO);
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.remaining_for_free_shipping, Decimal::ZERO);
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let pricing = PricingConfig {
            tax_rate: Decimal::new(825, 4),
            ..PricingConfig::default()
        };
        // 13 * 0.0825 = 1.0725
        let summary = OrderSummary::for_cart(&cart_with(&[(13, 1)]), &pricing);
        assert_eq!(summary.tax, Decimal::new(107, 2));
    }
}
