//! Print price tiers: volume-discounted per-unit printing cost.
//!
//! The print price matrix service returns a flat threshold → unit-price
//! map per insert format. Thresholds sort ascending into contiguous tiers:
//! each tier runs from its threshold up to one less than the next
//! threshold, and the last tier is open-ended.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

/// One band of a print-cost schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintPriceTier {
    pub min_quantity: u64,
    /// `None` on the final, open-ended tier.
    pub max_quantity: Option<u64>,
    pub price_per_unit: Decimal,
}

/// An ordered print-cost schedule for a single insert print format.
///
/// Rebuilt whenever the user selects a different format; holds tiers
/// sorted ascending by `min_quantity`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrintPriceMatrix {
    tiers: Vec<PrintPriceTier>,
}

impl PrintPriceMatrix {
    /// Builds the tier schedule from a threshold → unit-price map.
    #[must_use]
    pub fn from_thresholds(thresholds: &BTreeMap<u64, Decimal>) -> Self {
        let entries: Vec<(u64, Decimal)> =
            thresholds.iter().map(|(q, p)| (*q, *p)).collect();
        let tiers = entries
            .iter()
            .enumerate()
            .map(|(i, &(min_quantity, price_per_unit))| PrintPriceTier {
                min_quantity,
                max_quantity: entries.get(i + 1).map(|&(next, _)| next - 1),
                price_per_unit,
            })
            .collect();
        Self { tiers }
    }

    #[must_use]
    pub fn tiers(&self) -> &[PrintPriceTier] {
        &self.tiers
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The per-unit price applicable to `quantity`.
    ///
    /// Matching takes the highest-`min` tier containing the quantity. A
    /// quantity below the smallest tier's minimum is charged at the
    /// smallest tier's price. Returns `None` only for an empty matrix.
    #[must_use]
    pub fn unit_price_for(&self, quantity: u64) -> Option<Decimal> {
        let first = self.tiers.first()?;
        if quantity < first.min_quantity {
            return Some(first.price_per_unit);
        }
        let contained = self
            .tiers
            .iter()
            .rev()
            .find(|t| {
                t.min_quantity <= quantity
                    && t.max_quantity.is_none_or(|max| quantity <= max)
            })
            .map(|t| t.price_per_unit);
        // Tiers built by from_thresholds are contiguous, but tolerate a
        // gapped schedule by charging the nearest tier below.
        contained.or_else(|| {
            self.tiers
                .iter()
                .rev()
                .find(|t| t.min_quantity <= quantity)
                .map(|t| t.price_per_unit)
        })
    }
}
