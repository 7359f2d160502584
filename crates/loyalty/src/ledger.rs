//! Loyalty ledger — owns one user's account state for the session and
//! applies every mutation as a single settled step before notifying
//! observers. The pure math lives in `LoyaltyEngine`; this wrapper adds
//! state ownership, wall-clock time, and change notification.

use chrono::Utc;
use std::sync::Arc;
use velvet_core::config::LoyaltyConfig;
use velvet_core::event_bus::{make_event, EventSink, LedgerEventKind};
use velvet_core::loyalty::{
    Achievement, LoyaltyAccount, PointsBreakdown, Reward, Tier, TransactionRecord, VenueStat,
};
use velvet_core::VelvetResult;

use crate::engine::LoyaltyEngine;
use crate::fixtures;

pub struct LoyaltyLedger {
    account: LoyaltyAccount,
    engine: LoyaltyEngine,
    sink: Arc<dyn EventSink>,
}

impl LoyaltyLedger {
    /// New session ledger with the starter achievement and reward inventory.
    pub fn new(
        user_id: impl Into<String>,
        config: &LoyaltyConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let mut account = LoyaltyAccount::new(user_id);
        account.achievements = fixtures::starter_achievements();
        account.available_rewards = fixtures::starter_rewards();
        Self {
            account,
            engine: LoyaltyEngine::new(config),
            sink,
        }
    }

    // ── writes ──

    /// Manually credit points (goodwill adjustments, promo grants).
    pub fn award_points(&mut self, amount: u64) {
        let before = self.account.tier;
        self.engine.award_points(&mut self.account, amount);
        self.emit(LedgerEventKind::PointsEarned, Some(amount), None);
        self.emit_tier_change(before);
    }

    /// Record a completed booking or order and return the points earned.
    pub fn record_transaction(
        &mut self,
        record: &TransactionRecord,
    ) -> VelvetResult<PointsBreakdown> {
        let before = self.account.tier;
        let outcome = self
            .engine
            .record_transaction(&mut self.account, record, Utc::now())?;

        self.emit(
            LedgerEventKind::TransactionRecorded,
            Some(outcome.total),
            Some(record.venue_name.clone()),
        );
        for title in &outcome.unlocked {
            self.emit(
                LedgerEventKind::AchievementUnlocked,
                None,
                Some(title.clone()),
            );
        }
        self.emit_tier_change(before);
        Ok(outcome)
    }

    /// Redeem a reward by id; on failure the account is untouched.
    pub fn redeem_reward(&mut self, reward_id: &str) -> VelvetResult<Reward> {
        let before = self.account.tier;
        let reward = self
            .engine
            .redeem_reward(&mut self.account, reward_id, Utc::now())?;
        self.emit(
            LedgerEventKind::RewardRedeemed,
            Some(reward.point_cost),
            Some(reward.title.clone()),
        );
        self.emit_tier_change(before);
        Ok(reward)
    }

    // ── reads ──

    pub fn current_points(&self) -> u64 {
        self.account.current_points
    }

    pub fn lifetime_points(&self) -> u64 {
        self.account.lifetime_points
    }

    pub fn tier(&self) -> Tier {
        self.account.tier
    }

    pub fn progress_to_next_tier(&self) -> u8 {
        self.engine.progress_to_next_tier(&self.account)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.account.achievements
    }

    pub fn venue_stats(&self) -> &[VenueStat] {
        &self.account.venue_stats
    }

    /// Rewards still redeemable today (expired ones are hidden, not removed).
    pub fn available_rewards(&self) -> Vec<Reward> {
        let today = Utc::now().date_naive();
        self.account
            .available_rewards
            .iter()
            .filter(|r| !r.is_expired(today))
            .cloned()
            .collect()
    }

    pub fn redeemed_rewards(&self) -> &[Reward] {
        &self.account.redeemed_rewards
    }

    pub fn account(&self) -> &LoyaltyAccount {
        &self.account
    }

    fn emit(&self, kind: LedgerEventKind, points: Option<u64>, detail: Option<String>) {
        self.sink.emit(make_event(
            kind,
            Some(self.account.user_id.clone()),
            points,
            Some(self.account.tier),
            detail,
        ));
    }

    fn emit_tier_change(&self, before: Tier) {
        if self.account.tier == before {
            return;
        }
        let kind = if self.account.tier > before {
            LedgerEventKind::TierUpgrade
        } else {
            LedgerEventKind::TierDowngrade
        };
        self.emit(kind, None, Some(self.account.tier.label().to_string()));
    }
}
