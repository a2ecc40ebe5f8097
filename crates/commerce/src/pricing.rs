//! Order pricing: tax and shipping rules.

use common::Money;
use serde::{Deserialize, Serialize};

/// GST applied to every order, in percent.
pub const TAX_RATE_PERCENT: u32 = 18;

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_paise(100_000);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::from_paise(5_000);

/// The priced components of an order.
///
/// All components are held in full paise precision; the only rounding in
/// the pipeline is the single half-up rounding inside the tax computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// Prices an order from its subtotal.
    pub fn from_subtotal(subtotal: Money) -> Self {
        let tax = subtotal.percent(TAX_RATE_PERCENT);
        let shipping = if subtotal >= FREE_SHIPPING_THRESHOLD {
            Money::zero()
        } else {
            FLAT_SHIPPING_FEE
        };
        let total = subtotal + tax + shipping;
        Self {
            subtotal,
            tax,
            shipping,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_pays_flat_shipping() {
        // 3 x ₹100 + 1 x ₹500 = ₹800; tax ₹144; shipping ₹50; total ₹994
        let breakdown = PriceBreakdown::from_subtotal(Money::from_rupees(800));
        assert_eq!(breakdown.tax, Money::from_rupees(144));
        assert_eq!(breakdown.shipping, Money::from_rupees(50));
        assert_eq!(breakdown.total, Money::from_rupees(994));
    }

    #[test]
    fn at_threshold_ships_free() {
        let breakdown = PriceBreakdown::from_subtotal(Money::from_rupees(1000));
        assert_eq!(breakdown.shipping, Money::zero());
        assert_eq!(breakdown.total, Money::from_rupees(1180));
    }

    #[test]
    fn total_is_sum_of_components() {
        for subtotal in [1, 99, 999_99, 100_000, 250_050] {
            let breakdown = PriceBreakdown::from_subtotal(Money::from_paise(subtotal));
            assert_eq!(
                breakdown.total,
                breakdown.subtotal + breakdown.tax + breakdown.shipping
            );
        }
    }
}
