//! Order total calculations.

use crate::cart::CartLineItem;
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Business rules the totals are derived with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Currency every amount is in.
    pub currency: Currency,
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Money,
    /// Shipping charged at or below the threshold.
    pub flat_shipping_rate: Money,
    /// Tax rate in basis points (1500 = 15%).
    pub tax_rate_bps: u32,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::for_currency(Currency::default())
    }
}

impl PricingRules {
    /// The storefront's standard rules (free shipping above 100, flat rate
    /// 100, 15% tax) in `currency`.
    pub fn for_currency(currency: Currency) -> Self {
        Self {
            currency,
            free_shipping_threshold: Money::new(10_000, currency),
            flat_shipping_rate: Money::new(10_000, currency),
            tax_rate_bps: 1500,
        }
    }

    /// Build rules from decimal configuration values.
    ///
    /// ```
    /// use shop_commerce::cart::PricingRules;
    /// use shop_commerce::money::Currency;
    ///
    /// let rules = PricingRules::from_decimal(Currency::BDT, 100.0, 100.0, 15.0).unwrap();
    /// assert_eq!(rules, PricingRules::default());
    /// ```
    pub fn from_decimal(
        currency: Currency,
        free_shipping_threshold: f64,
        flat_shipping_rate: f64,
        tax_rate_percent: f64,
    ) -> Result<Self, CommerceError> {
        for (name, value) in [
            ("free_shipping_threshold", free_shipping_threshold),
            ("flat_shipping_rate", flat_shipping_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CommerceError::InvalidPricingRule(format!(
                    "{name} must be a non-negative amount, got {value}"
                )));
            }
        }
        if !tax_rate_percent.is_finite() || !(0.0..=100.0).contains(&tax_rate_percent) {
            return Err(CommerceError::InvalidPricingRule(format!(
                "tax_rate_percent must be between 0 and 100, got {tax_rate_percent}"
            )));
        }

        Ok(Self {
            currency,
            free_shipping_threshold: Money::from_decimal(free_shipping_threshold, currency),
            flat_shipping_rate: Money::from_decimal(flat_shipping_rate, currency),
            tax_rate_bps: (tax_rate_percent * 100.0).round() as u32,
        })
    }

    /// Shipping cost for a subtotal.
    pub fn shipping_for(&self, items_price: &Money) -> Money {
        if items_price.amount_micros > self.free_shipping_threshold.amount_micros {
            Money::zero(self.currency)
        } else {
            self.flat_shipping_rate
        }
    }

    /// Tax on a subtotal, rounded half-up to the minor unit.
    pub fn tax_for(&self, items_price: &Money) -> Result<Money, CommerceError> {
        items_price.apply_rate_bps(self.tax_rate_bps)
    }

    /// Derive the order totals for a set of line items.
    pub fn calculate(&self, items: &[CartLineItem]) -> Result<OrderTotals, CommerceError> {
        let items_price = items.iter().try_fold(Money::zero(self.currency), |acc, item| {
            acc.try_add(&item.line_total()?)
        })?;
        let shipping_price = self.shipping_for(&items_price);
        let tax_price = self.tax_for(&items_price)?;
        let total_price = items_price.try_add(&shipping_price)?.try_add(&tax_price)?;

        Ok(OrderTotals {
            items_price,
            shipping_price,
            tax_price,
            total_price,
        })
    }
}

/// Totals shown on the review page and sent with the order.
///
/// Always recomputed from the cart, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of `price * qty` over the line items.
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    /// items + shipping + tax.
    pub total_price: Money,
}

impl OrderTotals {
    /// Check if the order ships free.
    pub fn is_free_shipping(&self) -> bool {
        self.shipping_price.is_zero()
    }
}
