//! Price breakdown — the derived result of pricing a selection. Never
//! stored; recomputed on demand from the selection and the catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Line-by-line price decomposition for a booking or an order.
///
/// Invariants (upheld by the pricing engine):
/// - `subtotal` = base_price + add_ons_total + experiences_total + items_total
/// - 0 ≤ `discount` ≤ `subtotal`
/// - `total` = `subtotal` − `discount`, never negative
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub add_ons_total: Decimal,
    pub experiences_total: Decimal,
    pub items_total: Decimal,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_discounted(&self) -> bool {
        self.discount > Decimal::ZERO
    }
}
