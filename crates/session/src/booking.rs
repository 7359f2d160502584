//! Booking session — mutable state for one in-progress reservation. Every
//! derived value is delegated to the pricing engine on demand; mutations
//! validate first, then change state, then notify.

use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::debug;
use velvet_catalog::CatalogStore;
use velvet_core::breakdown::PriceBreakdown;
use velvet_core::config::SessionConfig;
use velvet_core::event_bus::{make_event, EventSink, LedgerEventKind};
use velvet_core::loyalty::{TransactionRecord, TransactionType};
use velvet_core::types::{BookingType, ContactInfo, SelectionScope};
use velvet_core::{VelvetError, VelvetResult};
use velvet_pricing::{resolve_coupon, AppliedCoupon, BookingSelection, PricingEngine};

pub struct BookingSession {
    selection: BookingSelection,
    date: Option<NaiveDate>,
    time_slot: Option<NaiveTime>,
    contact: ContactInfo,
    catalog: Arc<CatalogStore>,
    engine: PricingEngine,
    config: SessionConfig,
    sink: Arc<dyn EventSink>,
}

impl BookingSession {
    pub fn new(catalog: Arc<CatalogStore>, config: &SessionConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            selection: BookingSelection {
                guest_count: 1,
                ..BookingSelection::default()
            },
            date: None,
            time_slot: None,
            contact: ContactInfo::default(),
            engine: PricingEngine::new(Arc::clone(&catalog)),
            catalog,
            config: config.clone(),
            sink,
        }
    }

    // ── mutations ──

    /// Change the booking type. Previously selected add-ons and experiences
    /// stay selected; ones that no longer apply simply stop pricing in.
    pub fn set_booking_type(&mut self, booking_type: BookingType) {
        self.selection.booking_type = Some(booking_type);
        self.notify_changed();
    }

    pub fn set_guest_count(&mut self, guests: u32) -> VelvetResult<()> {
        if guests == 0 {
            return Err(VelvetError::Validation(
                "guest count must be at least 1".into(),
            ));
        }
        if guests > self.config.max_guests {
            return Err(VelvetError::Validation(format!(
                "guest count {guests} exceeds the maximum of {}",
                self.config.max_guests
            )));
        }
        self.selection.guest_count = guests;
        self.notify_changed();
        Ok(())
    }

    pub fn set_schedule(&mut self, date: NaiveDate, time_slot: NaiveTime) {
        self.date = Some(date);
        self.time_slot = Some(time_slot);
        self.notify_changed();
    }

    pub fn set_contact(&mut self, contact: ContactInfo) {
        self.contact = contact;
    }

    /// Select an add-on. The id must exist in the catalog; selecting one
    /// that doesn't apply to the current booking type is allowed and prices
    /// to zero. Re-selecting is a no-op.
    pub fn add_add_on(&mut self, id: &str) -> VelvetResult<()> {
        if self.catalog.add_on(id).is_none() {
            return Err(VelvetError::Validation(format!("unknown add-on id: {id}")));
        }
        if !self.selection.add_on_ids.iter().any(|existing| existing == id) {
            self.selection.add_on_ids.push(id.to_string());
            self.notify_changed();
        }
        Ok(())
    }

    pub fn remove_add_on(&mut self, id: &str) {
        let before = self.selection.add_on_ids.len();
        self.selection.add_on_ids.retain(|existing| existing != id);
        if self.selection.add_on_ids.len() != before {
            self.notify_changed();
        }
    }

    pub fn add_experience(&mut self, id: &str) -> VelvetResult<()> {
        if self.catalog.experience(id).is_none() {
            return Err(VelvetError::Validation(format!(
                "unknown experience id: {id}"
            )));
        }
        if !self
            .selection
            .experience_ids
            .iter()
            .any(|existing| existing == id)
        {
            self.selection.experience_ids.push(id.to_string());
            self.notify_changed();
        }
        Ok(())
    }

    pub fn remove_experience(&mut self, id: &str) {
        let before = self.selection.experience_ids.len();
        self.selection
            .experience_ids
            .retain(|existing| existing != id);
        if self.selection.experience_ids.len() != before {
            self.notify_changed();
        }
    }

    /// Validate a coupon against the current selection and store it on
    /// success, replacing any previous coupon. On failure the selection is
    /// untouched and the reason is returned.
    pub fn apply_coupon(&mut self, code: &str) -> VelvetResult<AppliedCoupon> {
        let Some(booking_type) = self.selection.booking_type else {
            return Err(VelvetError::Validation(
                "choose a booking type before applying a coupon".into(),
            ));
        };
        let subtotal = self.breakdown().subtotal;
        let applied = resolve_coupon(
            &self.catalog,
            code,
            SelectionScope::Booking(booking_type),
            subtotal,
            Utc::now().date_naive(),
        )?;
        self.selection.coupon_code = Some(applied.code.clone());
        debug!(code = %applied.code, discount = %applied.discount, "Coupon applied to booking");
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

    /// Clear the session back to its initial state (completion or abandon).
    pub fn reset(&mut self) {
        self.selection = BookingSelection {
            guest_count: 1,
            ..BookingSelection::default()
        };
        self.date = None;
        self.time_slot = None;
        self.contact = ContactInfo::default();
        self.notify_changed();
    }

    // ── reads ──

    /// Price the current selection. Pure; recomputed on every call.
    pub fn breakdown(&self) -> PriceBreakdown {
        self.engine
            .booking_breakdown(&self.selection, Utc::now().date_naive())
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn schedule(&self) -> (Option<NaiveDate>, Option<NaiveTime>) {
        (self.date, self.time_slot)
    }

    /// Completion glue: the transaction the loyalty ledger should record for
    /// this booking at its current price.
    pub fn transaction_record(&self, venue_id: &str, venue_name: &str) -> TransactionRecord {
        TransactionRecord {
            venue_id: venue_id.to_string(),
            venue_name: venue_name.to_string(),
            amount_spent: self.breakdown().total,
            count: self.selection.guest_count,
            transaction_type: TransactionType::Booking,
        }
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
    use velvet_core::event_bus::{capture_sink, noop_sink};

    fn session() -> BookingSession {
        BookingSession::new(
            Arc::new(CatalogStore::with_fixtures()),
            &SessionConfig::default(),
            noop_sink(),
        )
    }

    #[test]
    fn test_vip_couch_for_two_prices_at_cover() {
        let mut session = session();
        session.set_booking_type(BookingType::VipCouch);
        session.set_guest_count(2).unwrap();
        let breakdown = session.breakdown();
        assert_eq!(breakdown.base_price, dec!(150));
        assert_eq!(breakdown.total, dec!(150));
    }

    #[test]
    fn test_guest_count_validation() {
        let mut session = session();
        assert!(session.set_guest_count(0).is_err());
        assert!(session.set_guest_count(21).is_err());
        assert_eq!(session.selection().guest_count, 1);
        assert!(session.set_guest_count(20).is_ok());
    }

    #[test]
    fn test_unknown_add_on_rejected_before_mutation() {
        let mut session = session();
        session.set_booking_type(BookingType::VipCouch);
        let err = session.add_add_on("addon-ghost").unwrap_err();
        assert!(matches!(err, VelvetError::Validation(_)));
        assert!(session.selection().add_on_ids.is_empty());
    }

    #[test]
    fn test_duplicate_add_on_is_ignored() {
        let mut session = session();
        session.set_booking_type(BookingType::VipCouch);
        session.add_add_on("addon-sparklers").unwrap();
        session.add_add_on("addon-sparklers").unwrap();
        assert_eq!(session.selection().add_on_ids.len(), 1);
        assert_eq!(session.breakdown().add_ons_total, dec!(25));
    }

    #[test]
    fn test_coupon_apply_and_replace() {
        let mut session = session();
        session.set_booking_type(BookingType::VipCouch);
        session.set_guest_count(2).unwrap();

        let applied = session.apply_coupon("VIP20").unwrap();
        assert_eq!(applied.discount, dec!(30.00));
        assert_eq!(session.breakdown().total, dec!(120.00));

        // A second coupon replaces the first — never stacks.
        let applied = session.apply_coupon("WELCOME10").unwrap();
        assert_eq!(applied.discount, dec!(10));
        let breakdown = session.breakdown();
        assert_eq!(breakdown.discount, dec!(10));
        assert_eq!(breakdown.total, dec!(140));
    }

    #[test]
    fn test_rejected_coupon_leaves_selection_unchanged() {
        let mut session = session();
        session.set_booking_type(BookingType::VipCouch);
        session.set_guest_count(1).unwrap(); // subtotal 75, below VIP20's 150
        let err = session.apply_coupon("VIP20").unwrap_err();
        assert!(matches!(err, VelvetError::BelowMinimumSpend { .. }));
        assert!(session.selection().coupon_code.is_none());
        assert_eq!(session.breakdown().discount, dec!(0));
    }

    #[test]
    fn test_booking_type_change_keeps_stale_selection() {
        let mut session = session();
        session.set_booking_type(BookingType::VipCouch);
        session.set_guest_count(2).unwrap();
        session.add_add_on("addon-sparklers").unwrap();
        assert_eq!(session.breakdown().add_ons_total, dec!(25));

        session.set_booking_type(BookingType::StandardTable);
        assert_eq!(session.selection().add_on_ids.len(), 1);
        assert_eq!(session.breakdown().add_ons_total, dec!(0));
    }

    #[test]
    fn test_coupon_events() {
        let sink = capture_sink();
        let mut session = BookingSession::new(
            Arc::new(CatalogStore::with_fixtures()),
            &SessionConfig::default(),
            sink.clone(),
        );
        session.set_booking_type(BookingType::VipCouch);
        session.set_guest_count(2).unwrap();
        session.apply_coupon("VIP20").unwrap();
        session.remove_coupon();
        assert_eq!(sink.count_kind(LedgerEventKind::CouponApplied), 1);
        assert_eq!(sink.count_kind(LedgerEventKind::CouponRemoved), 1);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut session = session();
        session.set_booking_type(BookingType::VipBooth);
        session.set_guest_count(6).unwrap();
        session.add_add_on("addon-sparklers").unwrap();
        session.apply_coupon("VIP20").unwrap();

        session.reset();
        assert!(session.selection().booking_type.is_none());
        assert_eq!(session.selection().guest_count, 1);
        assert!(session.selection().add_on_ids.is_empty());
        assert!(session.selection().coupon_code.is_none());
        assert_eq!(session.breakdown(), PriceBreakdown::zero());
    }

    #[test]
    fn test_transaction_record_reflects_current_price() {
        let mut session = session();
        session.set_booking_type(BookingType::VipCouch);
        session.set_guest_count(2).unwrap();
        session.apply_coupon("VIP20").unwrap();
        let record = session.transaction_record("venue-1", "The Velvet Room");
        assert_eq!(record.amount_spent, dec!(120.00));
        assert_eq!(record.count, 2);
        assert_eq!(record.transaction_type, TransactionType::Booking);
    }
}
