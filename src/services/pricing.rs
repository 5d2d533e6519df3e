use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::AppConfig;
use crate::entities::{PriceBreakdown, ResolvedCartItem};

/// Computes cart totals from resolved line items.
///
/// A pure calculator: no store access, no side effects, safe to re-run on
/// every cart read. Rates and thresholds come from [`AppConfig`].
///
/// Rounding policy: intermediate sums keep full Decimal precision; each
/// output field is rounded to two fraction digits (half-up, midpoint away
/// from zero) only at the end, so per-line rounding error never compounds.
#[derive(Clone)]
pub struct PricingService {
    tax_rate: Decimal,
    free_shipping_threshold: Decimal,
    standard_shipping_fee: Decimal,
}

impl PricingService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            tax_rate: Decimal::from_f64_retain(config.tax_rate).unwrap_or(Decimal::ZERO),
            free_shipping_threshold: Decimal::from_f64_retain(config.free_shipping_threshold)
                .unwrap_or(Decimal::ZERO),
            standard_shipping_fee: Decimal::from_f64_retain(config.standard_shipping_fee)
                .unwrap_or(Decimal::ZERO),
        }
    }

    /// Prices a resolved cart.
    ///
    /// - Subtotal: Σ (effective unit price + lens surcharge) × quantity.
    /// - Shipping: free strictly above the threshold, otherwise the flat
    ///   fee. A subtotal of exactly the threshold still pays shipping. An
    ///   empty cart ships nothing and pays nothing.
    /// - Tax: flat rate applied to the subtotal only; shipping is not taxed.
    pub fn price_items(&self, items: &[ResolvedCartItem]) -> PriceBreakdown {
        if items.is_empty() {
            return PriceBreakdown::zero();
        }

        let subtotal: Decimal = items.iter().map(ResolvedCartItem::line_total).sum();
        let shipping = self.shipping_for(subtotal);
        let tax = subtotal * self.tax_rate;
        let total = subtotal + shipping + tax;

        PriceBreakdown {
            subtotal: present(subtotal),
            shipping: present(shipping),
            tax: present(tax),
            total: present(total),
        }
    }

    fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.standard_shipping_fee
        }
    }
}

/// Final presentation rounding: two fraction digits, half-up.
fn present(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
