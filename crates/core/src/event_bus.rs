//! Change-notification sink — trait for emitting ledger and session events
//! from any module.
//!
//! The stateful containers accept an `Arc<dyn EventSink>` and emit an event
//! after each mutation has fully settled; the presentation layer subscribes
//! to re-render. Keeps the state owners decoupled from whoever observes them.

use crate::loyalty::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// What happened. Mirrors the ledger and session mutation operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEventKind {
    PointsEarned,
    TransactionRecorded,
    TierUpgrade,
    TierDowngrade,
    AchievementUnlocked,
    RewardRedeemed,
    CouponApplied,
    CouponRemoved,
    SelectionChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub event_id: Uuid,
    pub kind: LedgerEventKind,
    pub user_id: Option<String>,
    pub points: Option<u64>,
    pub tier: Option<Tier>,
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Trait for observing state changes. Implementations route events to a UI
/// re-render hook, a log, or a test capture buffer.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: LedgerEvent);
}

/// No-op sink for modules that don't need notification.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _event: LedgerEvent) {}
}

/// In-memory sink that captures events for testing.
#[derive(Default)]
pub struct CaptureSink {
    events: Mutex<Vec<LedgerEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().expect("event sink mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("event sink mutex poisoned").len()
    }

    pub fn count_kind(&self, kind: LedgerEventKind) -> usize {
        self.events
            .lock()
            .expect("event sink mutex poisoned")
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().expect("event sink mutex poisoned").clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: LedgerEvent) {
        self.events
            .lock()
            .expect("event sink mutex poisoned")
            .push(event);
    }
}

/// Convenience builder for creating a `LedgerEvent` with minimal boilerplate.
pub fn make_event(
    kind: LedgerEventKind,
    user_id: Option<String>,
    points: Option<u64>,
    tier: Option<Tier>,
    detail: Option<String>,
) -> LedgerEvent {
    LedgerEvent {
        event_id: Uuid::new_v4(),
        kind,
        user_id,
        points,
        tier,
        detail,
        timestamp: Utc::now(),
    }
}

/// Convenience: create a no-op sink for modules that don't need one.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}
