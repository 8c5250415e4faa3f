// Pricing Engine
//
// Computes the final display price and discount badge percentage from a
// product's raw discount configuration. The computation is total: every
// input combination yields a safe, clamped result, and a misconfigured
// discount can never make an item free or push its price below zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a discount value should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Value is a percentage of the original price (e.g. 10 = 10% off)
    Percentage,

    /// Value is an amount subtracted from the original price
    Amount,

    /// Value IS the final price
    Fixed,
}

impl DiscountType {
    /// Parse the catalog's free-form discount type string.
    ///
    /// Matching is case-insensitive and accepts the Spanish names the hosted
    /// catalog uses (`porcentaje`, `monto`). Unknown or missing values fall
    /// back to `Percentage`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("monto") | Some("amount") => DiscountType::Amount,
            Some("fixed") | Some("fijo") => DiscountType::Fixed,
            _ => DiscountType::Percentage,
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Amount => write!(f, "amount"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

/// Raw discount configuration of a single product.
///
/// Built once at the catalog boundary; missing numeric fields arrive here
/// already coerced to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountConfig {
    pub original_price: Decimal,
    pub value: Decimal,
    pub kind: DiscountType,

    /// Explicit toggle from the catalog; `None` means the field was absent.
    pub enabled: Option<bool>,
}

/// Result of a discount computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingResult {
    pub original_price: Decimal,
    pub final_price: Decimal,

    /// Integer percentage in [0, 100] for the discount badge.
    pub percent: u32,

    /// True only when a non-degenerate discount was applied.
    pub applies: bool,
}

impl PricingResult {
    /// Result for a product whose price is displayed as-is.
    fn unchanged(original_price: Decimal) -> Self {
        Self {
            original_price,
            final_price: original_price,
            percent: 0,
            applies: false,
        }
    }
}

/// Compute the final price and badge percentage for a discount configuration.
///
/// A discount is eligible when the explicit toggle is not `false`, the value
/// is positive, and the original price is positive. Ineligible configurations
/// return the original price untouched with `applies = false`.
pub fn compute_discount(config: &DiscountConfig) -> PricingResult {
    let original = config.original_price;

    let eligible = config.enabled != Some(false)
        && config.value > Decimal::ZERO
        && original > Decimal::ZERO;

    if !eligible {
        return PricingResult::unchanged(original);
    }

    let hundred = Decimal::from(100);
    let (final_price, percent) = match config.kind {
        DiscountType::Amount => (
            original - config.value,
            config.value / original * hundred,
        ),
        DiscountType::Fixed => (
            config.value,
            (original - config.value) / original * hundred,
        ),
        DiscountType::Percentage => (
            original * (Decimal::ONE - config.value / hundred),
            config.value,
        ),
    };

    let final_price = final_price.max(Decimal::ZERO);
    let percent = clamp_percent(percent);

    // A discount that drives the price to zero is treated as misconfigured
    // and ignored entirely.
    if final_price <= Decimal::ZERO {
        return PricingResult::unchanged(original);
    }

    PricingResult {
        original_price: original,
        final_price,
        percent,
        applies: true,
    }
}

/// Round to a whole number (midpoint away from zero) and clamp into [0, 100].
fn clamp_percent(value: Decimal) -> u32 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded <= Decimal::ZERO {
        0
    } else if rounded >= Decimal::from(100) {
        100
    } else {
        rounded.to_u32().unwrap_or(0)
    }
}
