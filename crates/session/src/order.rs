//! Order session — mutable cart state for one in-progress venue order.
//! Same shape as the booking session: validate, mutate, notify, and price
//! on demand through the engine.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use velvet_catalog::CatalogStore;
use velvet_core::breakdown::PriceBreakdown;
use velvet_core::config::SessionConfig;
use velvet_core::event_bus::{make_event, EventSink, LedgerEventKind};
use velvet_core::loyalty::{TransactionRecord, TransactionType};
use velvet_core::types::{OrderType, SelectionScope};
use velvet_core::{VelvetError, VelvetResult};
use velvet_pricing::{resolve_coupon, AppliedCoupon, CartLine, OrderSelection, PricingEngine};

pub struct OrderSession {
    selection: OrderSelection,
    catalog: Arc<CatalogStore>,
    engine: PricingEngine,
    config: SessionConfig,
    sink: Arc<dyn EventSink>,
}

impl OrderSession {
    pub fn new(
        order_type: OrderType,
        catalog: Arc<CatalogStore>,
        config: &SessionConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            selection: OrderSelection {
                order_type,
                lines: Vec::new(),
                coupon_code: None,
            },
            engine: PricingEngine::new(Arc::clone(&catalog)),
            catalog,
            config: config.clone(),
            sink,
        }
    }

    // ── mutations ──

    /// Switch the fulfillment channel. Lines that the new channel can't
    /// serve stay in the cart and price to zero.
    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.selection.order_type = order_type;
        self.notify_changed();
    }

    /// Add `quantity` units of an item, merging into an existing line.
    pub fn add_item(&mut self, item_id: &str, quantity: u32) -> VelvetResult<()> {
        if quantity == 0 {
            return Err(VelvetError::Validation(
                "quantity must be at least 1".into(),
            ));
        }
        if self.catalog.menu_item(item_id).is_none() {
            return Err(VelvetError::Validation(format!(
                "unknown menu item id: {item_id}"
            )));
        }
        let new_total = self.line_quantity(item_id) + quantity;
        if new_total > self.config.max_line_quantity {
            return Err(VelvetError::Validation(format!(
                "line quantity {new_total} exceeds the maximum of {}",
                self.config.max_line_quantity
            )));
        }

        match self
            .selection
            .lines
            .iter_mut()
            .find(|line| line.item_id == item_id)
        {
            Some(line) => line.quantity = new_total,
            None => self.selection.lines.push(CartLine {
                item_id: item_id.to_string(),
                quantity,
                extra_ids: Vec::new(),
            }),
        }
        self.notify_changed();
        Ok(())
    }

    /// Set a line's quantity outright; zero removes the line.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> VelvetResult<()> {
        if quantity == 0 {
            self.remove_item(item_id);
            return Ok(());
        }
        if quantity > self.config.max_line_quantity {
            return Err(VelvetError::Validation(format!(
                "line quantity {quantity} exceeds the maximum of {}",
                self.config.max_line_quantity
            )));
        }
        let Some(line) = self
            .selection
            .lines
            .iter_mut()
            .find(|line| line.item_id == item_id)
        else {
            return Err(VelvetError::Validation(format!(
                "no cart line for item: {item_id}"
            )));
        };
        line.quantity = quantity;
        self.notify_changed();
        Ok(())
    }

    pub fn remove_item(&mut self, item_id: &str) {
        let before = self.selection.lines.len();
        self.selection.lines.retain(|line| line.item_id != item_id);
        if self.selection.lines.len() != before {
            self.notify_changed();
        }
    }

    /// Attach an extra to a cart line. Priced once per unit of the line.
    pub fn add_extra(&mut self, item_id: &str, extra_id: &str) -> VelvetResult<()> {
        if self.catalog.menu_extra(extra_id).is_none() {
            return Err(VelvetError::Validation(format!(
                "unknown extra id: {extra_id}"
            )));
        }
        let Some(line) = self
            .selection
            .lines
            .iter_mut()
            .find(|line| line.item_id == item_id)
        else {
            return Err(VelvetError::Validation(format!(
                "no cart line for item: {item_id}"
            )));
        };
        if !line.extra_ids.iter().any(|existing| existing == extra_id) {
            line.extra_ids.push(extra_id.to_string());
            self.notify_changed();
        }
        Ok(())
    }

    pub fn remove_extra(&mut self, item_id: &str, extra_id: &str) {
        if let Some(line) = self
            .selection
            .lines
            .iter_mut()
            .find(|line| line.item_id == item_id)
        {
            let before = line.extra_ids.len();
            line.extra_ids.retain(|existing| existing != extra_id);
            if line.extra_ids.len() != before {
                self.notify_changed();
            }
        }
    }

    /// Validate a coupon against the cart and store it on success,
    /// replacing any previous one.
    pub fn apply_coupon(&mut self, code: &str) -> VelvetResult<AppliedCoupon> {
        let subtotal = self.breakdown().subtotal;
        let applied = resolve_coupon(
            &self.catalog,
            code,
            SelectionScope::Order(self.selection.order_type),
            subtotal,
            Utc::now().date_naive(),
        )?;
        self.selection.coupon_code = Some(applied.code.clone());
        debug!(code = %applied.code, discount = %applied.discount, "Coupon applied to order");
        self.sink.emit(make_event(
            LedgerEventKind::CouponApplied,
            None,
            None,
            None,
            Some(applied.code.clone()),
        ));
        Ok(applied)
    }

    pub fn remove_coupon(&mut self) {
        if self.selection.coupon_code.take().is_some() {
            self.sink
                .emit(make_event(LedgerEventKind::CouponRemoved, None, None, None, None));
        }
    }

    pub fn reset(&mut self) {
        self.selection.lines.clear();
        self.selection.coupon_code = None;
        self.notify_changed();
    }

    // ── reads ──

    pub fn breakdown(&self) -> PriceBreakdown {
        self.engine
            .order_breakdown(&self.selection, Utc::now().date_naive())
    }

    pub fn selection(&self) -> &OrderSelection {
        &self.selection
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u32 {
        self.selection.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.lines.is_empty()
    }

    /// Completion glue: the transaction the loyalty ledger should record
    /// for this order at its current price.
    pub fn transaction_record(&self, venue_id: &str, venue_name: &str) -> TransactionRecord {
        TransactionRecord {
            venue_id: venue_id.to_string(),
            venue_name: venue_name.to_string(),
            amount_spent: self.breakdown().total,
            count: self.item_count(),
            transaction_type: TransactionType::VenueOrder,
        }
    }

    fn line_quantity(&self, item_id: &str) -> u32 {
        self.selection
            .lines
            .iter()
            .find(|line| line.item_id == item_id)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }

    fn notify_changed(&self) {
        self.sink.emit(make_event(
            LedgerEventKind::SelectionChanged,
            None,
            None,
            None,
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use velvet_core::event_bus::noop_sink;

    fn session(order_type: OrderType) -> OrderSession {
        OrderSession::new(
            order_type,
            Arc::new(CatalogStore::with_fixtures()),
            &SessionConfig::default(),
            noop_sink(),
        )
    }

    #[test]
    fn test_add_items_merges_lines() {
        let mut session = session(OrderType::DineIn);
        session.add_item("item-espresso-martini", 1).unwrap();
        session.add_item("item-espresso-martini", 2).unwrap();
        assert_eq!(session.selection().lines.len(), 1);
        assert_eq!(session.item_count(), 3);
        assert_eq!(session.breakdown().items_total, dec!(48.00));
    }

    #[test]
    fn test_zero_quantity_add_is_rejected() {
        let mut session = session(OrderType::DineIn);
        let err = session.add_item("item-truffle-fries", 0).unwrap_err();
        assert!(matches!(err, VelvetError::Validation(_)));
        assert!(session.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut session = session(OrderType::DineIn);
        session.add_item("item-truffle-fries", 2).unwrap();
        session.set_quantity("item-truffle-fries", 0).unwrap();
        assert!(session.is_empty());
    }

    #[test]
    fn test_extras_require_an_existing_line() {
        let mut session = session(OrderType::DineIn);
        let err = session
            .add_extra("item-truffle-fries", "extra-truffle-shavings")
            .unwrap_err();
        assert!(matches!(err, VelvetError::Validation(_)));

        session.add_item("item-truffle-fries", 2).unwrap();
        session
            .add_extra("item-truffle-fries", "extra-truffle-shavings")
            .unwrap();
        // 2 × (14.00 + 6.00)
        assert_eq!(session.breakdown().items_total, dec!(40.00));
    }

    #[test]
    fn test_order_coupon_scope() {
        let mut session = session(OrderType::DineIn);
        session.add_item("item-wagyu-burger", 2).unwrap();
        let applied = session.apply_coupon("HAPPYHOUR15").unwrap();
        // 15% of 56.00
        assert_eq!(applied.discount, dec!(8.40));
        assert_eq!(session.breakdown().total, dec!(47.60));

        // VIP20 is booking-only.
        let err = session.apply_coupon("VIP20").unwrap_err();
        assert!(matches!(err, VelvetError::CouponNotApplicable { .. }));
        // The happy-hour coupon is still the active one.
        assert_eq!(
            session.selection().coupon_code.as_deref(),
            Some("HAPPYHOUR15")
        );
    }

    #[test]
    fn test_channel_switch_keeps_stale_lines() {
        let mut session = session(OrderType::DineIn);
        session.add_item("item-seabass", 1).unwrap();
        assert_eq!(session.breakdown().items_total, dec!(34.00));

        session.set_order_type(OrderType::Takeaway);
        assert_eq!(session.selection().lines.len(), 1);
        assert_eq!(session.breakdown().items_total, dec!(0));
    }

    #[test]
    fn test_reset_clears_cart_and_coupon() {
        let mut session = session(OrderType::BarTab);
        session.add_item("item-reserve-vodka", 1).unwrap();
        session.apply_coupon("HAPPYHOUR15").unwrap();
        session.reset();
        assert!(session.is_empty());
        assert!(session.selection().coupon_code.is_none());
        assert_eq!(session.breakdown(), PriceBreakdown::zero());
    }

    #[test]
    fn test_transaction_record_counts_items() {
        let mut session = session(OrderType::DineIn);
        session.add_item("item-truffle-fries", 2).unwrap();
        session.add_item("item-espresso-martini", 2).unwrap();
        let record = session.transaction_record("venue-1", "The Velvet Room");
        assert_eq!(record.count, 4);
        assert_eq!(record.amount_spent, dec!(60.00));
        assert_eq!(record.transaction_type, TransactionType::VenueOrder);
    }
}
