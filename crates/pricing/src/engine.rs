//! Pricing engine — pure computation from a selection and the catalog to a
//! price breakdown. No state, no side effects; recomputing with unchanged
//! inputs yields an identical breakdown.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use velvet_catalog::CatalogStore;
use velvet_core::breakdown::PriceBreakdown;
use velvet_core::types::{BookingType, OrderType, SelectionScope};

use crate::resolver::resolve_coupon;

/// Booking selection as the pricing engine sees it. The stateful session
/// wrapper in velvet-session owns mutation; this is the priced snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingSelection {
    pub booking_type: Option<BookingType>,
    pub guest_count: u32,
    pub add_on_ids: Vec<String>,
    pub experience_ids: Vec<String>,
    pub coupon_code: Option<String>,
}

/// One cart line of an in-venue order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub item_id: String,
    pub quantity: u32,
    /// Extras priced once per unit of this line.
    pub extra_ids: Vec<String>,
}

/// Cart selection as the pricing engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSelection {
    pub order_type: OrderType,
    pub lines: Vec<CartLine>,
    pub coupon_code: Option<String>,
}

/// Pricing engine over a shared catalog.
pub struct PricingEngine {
    catalog: Arc<CatalogStore>,
}

impl PricingEngine {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        info!("Pricing engine initialized");
        Self { catalog }
    }

    /// Price a booking: per-guest cover charge, applicable add-ons and
    /// experiences, then the coupon. Ids that don't resolve, aren't
    /// available, or don't apply to the current booking type contribute
    /// zero — a selection left stale by a booking-type change prices out,
    /// it doesn't error.
    pub fn booking_breakdown(
        &self,
        selection: &BookingSelection,
        today: NaiveDate,
    ) -> PriceBreakdown {
        let Some(booking_type) = selection.booking_type else {
            return PriceBreakdown::zero();
        };

        let base_price = booking_type.cover_charge() * Decimal::from(selection.guest_count);

        let add_ons_total: Decimal = selection
            .add_on_ids
            .iter()
            .filter_map(|id| self.catalog.add_on(id))
            .filter(|a| a.available && a.applies_to(booking_type))
            .map(|a| a.price)
            .sum();

        let experiences_total: Decimal = selection
            .experience_ids
            .iter()
            .filter_map(|id| self.catalog.experience(id))
            .filter(|e| e.available && e.applies_to(booking_type))
            .map(|e| e.price)
            .sum();

        let subtotal = base_price + add_ons_total + experiences_total;
        let discount = self.coupon_discount(
            selection.coupon_code.as_deref(),
            SelectionScope::Booking(booking_type),
            subtotal,
            today,
        );

        metrics::counter!("pricing.booking_breakdowns").increment(1);

        finish(
            PriceBreakdown {
                base_price,
                add_ons_total,
                experiences_total,
                ..PriceBreakdown::zero()
            },
            subtotal,
            discount,
        )
    }

    /// Price a cart: each line is unit price plus its applicable extras,
    /// multiplied by quantity. The same stale-id rule as bookings applies to
    /// lines and extras alike.
    pub fn order_breakdown(&self, selection: &OrderSelection, today: NaiveDate) -> PriceBreakdown {
        let items_total: Decimal = selection
            .lines
            .iter()
            .map(|line| self.line_total(line, selection.order_type))
            .sum();

        let subtotal = items_total;
        let discount = self.coupon_discount(
            selection.coupon_code.as_deref(),
            SelectionScope::Order(selection.order_type),
            subtotal,
            today,
        );

        metrics::counter!("pricing.order_breakdowns").increment(1);

        finish(
            PriceBreakdown {
                items_total,
                ..PriceBreakdown::zero()
            },
            subtotal,
            discount,
        )
    }

    fn line_total(&self, line: &CartLine, order_type: OrderType) -> Decimal {
        let Some(item) = self.catalog.menu_item(&line.item_id) else {
            return Decimal::ZERO;
        };
        if !item.available || !item.orderable_via(order_type) {
            return Decimal::ZERO;
        }

        let extras_per_unit: Decimal = line
            .extra_ids
            .iter()
            .filter_map(|id| self.catalog.menu_extra(id))
            .filter(|e| e.available && e.fits_category(item.category))
            .map(|e| e.price)
            .sum();

        (item.price + extras_per_unit) * Decimal::from(line.quantity)
    }

    /// Coupon contribution to a breakdown. The stored code is re-validated on
    /// every computation; one that no longer qualifies (cart shrank below the
    /// minimum spend, expiry passed) contributes zero for this computation
    /// without mutating the selection.
    fn coupon_discount(
        &self,
        code: Option<&str>,
        scope: SelectionScope,
        subtotal: Decimal,
        today: NaiveDate,
    ) -> Decimal {
        match code {
            None => Decimal::ZERO,
            Some(code) => resolve_coupon(&self.catalog, code, scope, subtotal, today)
                .map(|applied| applied.discount)
                .unwrap_or(Decimal::ZERO),
        }
    }
}

/// Fill in the derived fields: subtotal, clamped discount, non-negative
/// total, everything settled to the currency minor unit.
fn finish(mut breakdown: PriceBreakdown, subtotal: Decimal, discount: Decimal) -> PriceBreakdown {
    let discount = discount.min(subtotal).max(Decimal::ZERO);
    breakdown.subtotal = subtotal;
    breakdown.discount = discount;
    breakdown.total = (subtotal - discount)
        .max(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn engine() -> PricingEngine {
        PricingEngine::new(Arc::new(CatalogStore::with_fixtures()))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn vip_booking(guests: u32) -> BookingSelection {
        BookingSelection {
            booking_type: Some(BookingType::VipCouch),
            guest_count: guests,
            ..BookingSelection::default()
        }
    }

    #[test]
    fn test_vip_couch_cover_charge_for_two() {
        let breakdown = engine().booking_breakdown(&vip_booking(2), today());
        assert_eq!(breakdown.base_price, dec!(150));
        assert_eq!(breakdown.subtotal, dec!(150));
        assert_eq!(breakdown.discount, Decimal::ZERO);
        assert_eq!(breakdown.total, dec!(150));
    }

    #[test]
    fn test_standard_table_has_no_cover_charge() {
        let selection = BookingSelection {
            booking_type: Some(BookingType::StandardTable),
            guest_count: 6,
            ..BookingSelection::default()
        };
        let breakdown = engine().booking_breakdown(&selection, today());
        assert_eq!(breakdown.base_price, Decimal::ZERO);
        assert_eq!(breakdown.total, Decimal::ZERO);
    }

    #[test]
    fn test_vip20_on_vip_couch() {
        let mut selection = vip_booking(2);
        selection.coupon_code = Some("VIP20".into());
        let breakdown = engine().booking_breakdown(&selection, today());
        assert_eq!(breakdown.subtotal, dec!(150));
        assert_eq!(breakdown.discount, dec!(30.00));
        assert_eq!(breakdown.total, dec!(120.00));
    }

    #[test]
    fn test_add_ons_and_experiences_sum_in() {
        let mut selection = vip_booking(2);
        selection.add_on_ids = vec!["addon-sparklers".into(), "addon-welcome-shots".into()];
        selection.experience_ids = vec!["exp-mixology".into()];
        let breakdown = engine().booking_breakdown(&selection, today());
        assert_eq!(breakdown.add_ons_total, dec!(55));
        assert_eq!(breakdown.experiences_total, dec!(120));
        assert_eq!(breakdown.subtotal, dec!(325));
        assert_eq!(breakdown.total, dec!(325));
    }

    #[test]
    fn test_stale_selection_prices_to_zero() {
        // Sparklers only attach to VIP placements; after switching the
        // booking to a terrace the id stays selected but stops pricing in.
        let mut selection = vip_booking(2);
        selection.add_on_ids = vec!["addon-sparklers".into()];
        let vip = engine().booking_breakdown(&selection, today());
        assert_eq!(vip.add_ons_total, dec!(25));

        selection.booking_type = Some(BookingType::Terrace);
        let terrace = engine().booking_breakdown(&selection, today());
        assert_eq!(terrace.add_ons_total, Decimal::ZERO);
        assert_eq!(terrace.total, Decimal::ZERO);
    }

    #[test]
    fn test_unavailable_and_unknown_ids_price_to_zero() {
        let mut selection = vip_booking(1);
        selection.add_on_ids = vec!["addon-cake-service".into(), "addon-ghost".into()];
        let breakdown = engine().booking_breakdown(&selection, today());
        assert_eq!(breakdown.add_ons_total, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_is_deterministic() {
        let mut selection = vip_booking(3);
        selection.add_on_ids = vec!["addon-sparklers".into()];
        selection.coupon_code = Some("VIP20".into());
        let engine = engine();
        let first = engine.booking_breakdown(&selection, today());
        let second = engine.booking_breakdown(&selection, today());
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_lines_multiply_quantity() {
        let selection = OrderSelection {
            order_type: OrderType::DineIn,
            lines: vec![
                CartLine {
                    item_id: "item-espresso-martini".into(),
                    quantity: 2,
                    extra_ids: vec![],
                },
                CartLine {
                    item_id: "item-truffle-fries".into(),
                    quantity: 1,
                    extra_ids: vec![],
                },
            ],
            coupon_code: None,
        };
        let breakdown = engine().order_breakdown(&selection, today());
        // 2 × 16.00 + 14.00
        assert_eq!(breakdown.items_total, dec!(46.00));
        assert_eq!(breakdown.total, dec!(46.00));
    }

    #[test]
    fn test_extras_price_once_per_unit() {
        let selection = OrderSelection {
            order_type: OrderType::BarTab,
            lines: vec![CartLine {
                item_id: "item-espresso-martini".into(),
                quantity: 3,
                extra_ids: vec!["extra-premium-mixer".into()],
            }],
            coupon_code: None,
        };
        let breakdown = engine().order_breakdown(&selection, today());
        // 3 × (16.00 + 4.50)
        assert_eq!(breakdown.items_total, dec!(61.50));
    }

    #[test]
    fn test_extras_must_fit_the_line_category() {
        // Truffle shavings fit small plates and mains, not cocktails.
        let selection = OrderSelection {
            order_type: OrderType::DineIn,
            lines: vec![CartLine {
                item_id: "item-espresso-martini".into(),
                quantity: 1,
                extra_ids: vec!["extra-truffle-shavings".into()],
            }],
            coupon_code: None,
        };
        let breakdown = engine().order_breakdown(&selection, today());
        assert_eq!(breakdown.items_total, dec!(16.00));
    }

    #[test]
    fn test_item_not_orderable_via_channel_is_excluded() {
        // Sea bass is dine-in only.
        let selection = OrderSelection {
            order_type: OrderType::Takeaway,
            lines: vec![CartLine {
                item_id: "item-seabass".into(),
                quantity: 1,
                extra_ids: vec![],
            }],
            coupon_code: None,
        };
        let breakdown = engine().order_breakdown(&selection, today());
        assert_eq!(breakdown.items_total, Decimal::ZERO);
    }

    #[test]
    fn test_lapsed_coupon_contributes_zero_without_erroring() {
        // Coupon stays applied while the cart shrinks below its minimum
        // spend; the breakdown quietly drops the discount.
        let mut selection = vip_booking(2);
        selection.coupon_code = Some("VIP20".into());
        let engine = engine();
        let qualifying = engine.booking_breakdown(&selection, today());
        assert_eq!(qualifying.discount, dec!(30.00));

        selection.guest_count = 1; // subtotal 75, below the 150 minimum
        let lapsed = engine.booking_breakdown(&selection, today());
        assert_eq!(lapsed.discount, Decimal::ZERO);
        assert_eq!(lapsed.total, dec!(75));
    }

    #[test]
    fn test_fixed_coupon_never_drives_total_negative() {
        let selection = OrderSelection {
            order_type: OrderType::DineIn,
            lines: vec![CartLine {
                item_id: "item-citrus-cooler".into(),
                quantity: 1,
                extra_ids: vec![],
            }],
            coupon_code: Some("WELCOME10".into()),
        };
        let breakdown = engine().order_breakdown(&selection, today());
        assert_eq!(breakdown.subtotal, dec!(8.00));
        assert_eq!(breakdown.discount, dec!(8.00));
        assert_eq!(breakdown.total, Decimal::ZERO);
    }

    #[test]
    fn test_unset_booking_type_prices_to_zero() {
        let selection = BookingSelection {
            guest_count: 4,
            add_on_ids: vec!["addon-welcome-shots".into()],
            ..BookingSelection::default()
        };
        let breakdown = engine().booking_breakdown(&selection, today());
        assert_eq!(breakdown, PriceBreakdown::zero());
    }
}
