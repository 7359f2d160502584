//! Core loyalty engine: handles point earning, transaction recording, tier
//! transitions, achievement grants, and reward redemption.
//!
//! Stateless computation over `LoyaltyAccount` data — every operation takes
//! the account by `&mut` and leaves all derived state (tier included) settled
//! before it returns. Time is an explicit argument so the math stays
//! deterministic.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};
use velvet_core::config::LoyaltyConfig;
use velvet_core::loyalty::{
    LoyaltyAccount, PointsBreakdown, Reward, Tier, TransactionRecord, VenueStat,
};
use velvet_core::{VelvetError, VelvetResult};

/// Loyalty program engine — stateless computation over LoyaltyAccount data.
pub struct LoyaltyEngine {
    config: LoyaltyConfig,
}

impl LoyaltyEngine {
    pub fn new(config: &LoyaltyConfig) -> Self {
        info!(
            enabled = config.enabled,
            insider = config.insider_threshold,
            vip = config.vip_threshold,
            legend = config.legend_threshold,
            "Loyalty engine initialized"
        );
        Self {
            config: config.clone(),
        }
    }

    /// Add points to the account and settle the tier. No other side effects.
    /// Returns true if the tier changed.
    pub fn award_points(&self, account: &mut LoyaltyAccount, amount: u64) -> bool {
        account.current_points += amount;
        account.lifetime_points += amount;
        metrics::counter!("loyalty.points_earned").increment(amount);
        self.evaluate_tier(account)
    }

    /// Record a completed transaction: award the base/count/spend components,
    /// the consecutive-visit bonus, update the venue stats, grant any newly
    /// satisfied achievements, then settle points and tier in one step.
    pub fn record_transaction(
        &self,
        account: &mut LoyaltyAccount,
        record: &TransactionRecord,
        now: DateTime<Utc>,
    ) -> VelvetResult<PointsBreakdown> {
        if record.amount_spent < Decimal::ZERO {
            return Err(VelvetError::Validation(format!(
                "amount spent must be non-negative, got {}",
                record.amount_spent
            )));
        }
        if !self.config.enabled {
            return Ok(PointsBreakdown {
                tier_after: account.tier,
                ..PointsBreakdown::default()
            });
        }

        let base_points = self.config.base_points_per_transaction;
        let count_points = self.config.points_per_count * u64::from(record.count);
        let spend_points = (record.amount_spent * self.config.points_per_dollar)
            .floor()
            .to_u64()
            .unwrap_or(0);

        // Streak: a prior transaction inside the window extends it, anything
        // else restarts it at 1.
        let consecutive_bonus = match account.days_since_last_transaction(now) {
            Some(days) if days <= self.config.consecutive_window_days => {
                account.consecutive_transactions += 1;
                self.config.consecutive_bonus_points
            }
            _ => {
                account.consecutive_transactions = 1;
                0
            }
        };

        self.upsert_venue_stat(account, record, now);

        let (achievement_points, unlocked) = self.grant_achievements(account, now);

        let total =
            base_points + count_points + spend_points + consecutive_bonus + achievement_points;
        let tier_changed = self.award_points(account, total);
        account.last_transaction = Some(now);

        metrics::counter!("loyalty.transactions_recorded").increment(1);
        debug!(
            user_id = %account.user_id,
            venue_id = %record.venue_id,
            points = total,
            balance = account.current_points,
            tier = %account.tier,
            "Transaction recorded"
        );

        Ok(PointsBreakdown {
            base_points,
            count_points,
            spend_points,
            consecutive_bonus,
            achievement_points,
            total,
            unlocked,
            tier_after: account.tier,
            tier_changed,
        })
    }

    /// Settle the tier from current points: highest tier whose threshold is
    /// covered, scanned from the top. Returns true if the tier changed.
    pub fn evaluate_tier(&self, account: &mut LoyaltyAccount) -> bool {
        let old_tier = account.tier;

        let new_tier = Tier::ALL
            .into_iter()
            .rev()
            .find(|tier| account.current_points >= self.config.threshold(*tier))
            .unwrap_or(Tier::Member);

        if new_tier != old_tier {
            account.tier = new_tier;
            if new_tier > old_tier {
                metrics::counter!("loyalty.tier_upgrades").increment(1);
                info!(
                    user_id = %account.user_id,
                    old = %old_tier,
                    new = %new_tier,
                    "Tier upgrade"
                );
            } else {
                metrics::counter!("loyalty.tier_downgrades").increment(1);
            }
            true
        } else {
            false
        }
    }

    /// Redeem a reward: both guards are checked before anything mutates, so
    /// a failure leaves the account untouched. On success the deduction,
    /// tier settle, and the move to the redeemed list happen in one step.
    pub fn redeem_reward(
        &self,
        account: &mut LoyaltyAccount,
        reward_id: &str,
        now: DateTime<Utc>,
    ) -> VelvetResult<Reward> {
        let position = account
            .available_rewards
            .iter()
            .position(|r| r.id == reward_id)
            .ok_or_else(|| VelvetError::RewardNotFound(reward_id.to_string()))?;

        let cost = account.available_rewards[position].point_cost;
        if account.current_points < cost {
            return Err(VelvetError::InsufficientPoints {
                required: cost,
                available: account.current_points,
            });
        }

        let mut reward = account.available_rewards.remove(position);
        account.current_points -= cost;
        self.evaluate_tier(account);
        reward.redeemed = true;
        reward.redemption_code = Some(redemption_code());
        reward.redeemed_at = Some(now);
        account.redeemed_rewards.push(reward.clone());

        metrics::counter!("loyalty.points_redeemed").increment(cost);
        metrics::counter!("loyalty.rewards_redeemed").increment(1);
        info!(
            user_id = %account.user_id,
            reward_id = %reward.id,
            cost = cost,
            balance = account.current_points,
            "Reward redeemed"
        );

        Ok(reward)
    }

    /// Progress toward the next tier as a whole percentage, clamped to
    /// [0, 100]. The top tier always reports 100.
    pub fn progress_to_next_tier(&self, account: &LoyaltyAccount) -> u8 {
        let Some(next) = account.tier.next() else {
            return 100;
        };
        let floor = self.config.threshold(account.tier);
        let ceiling = self.config.threshold(next);
        let span = ceiling.saturating_sub(floor);
        if span == 0 {
            return 100;
        }
        let into_span = account.current_points.saturating_sub(floor);
        // Integer round-half-up.
        let percent = (into_span * 100 + span / 2) / span;
        percent.min(100) as u8
    }

    pub fn config(&self) -> &LoyaltyConfig {
        &self.config
    }

    fn upsert_venue_stat(
        &self,
        account: &mut LoyaltyAccount,
        record: &TransactionRecord,
        now: DateTime<Utc>,
    ) {
        match account
            .venue_stats
            .iter_mut()
            .find(|s| s.venue_id == record.venue_id)
        {
            Some(stat) => {
                stat.visits += 1;
                stat.total_spent += record.amount_spent;
                stat.last_visit = now;
            }
            None => account.venue_stats.push(VenueStat {
                venue_id: record.venue_id.clone(),
                venue_name: record.venue_name.clone(),
                visits: 1,
                total_spent: record.amount_spent,
                last_visit: now,
            }),
        }
    }

    /// Grant every unachieved achievement whose condition the updated state
    /// now satisfies. The achieved flag makes each grant one-shot: once set,
    /// re-satisfying the condition never pays again.
    fn grant_achievements(
        &self,
        account: &mut LoyaltyAccount,
        now: DateTime<Utc>,
    ) -> (u64, Vec<String>) {
        let mut granted = 0u64;
        let mut unlocked = Vec::new();

        let pending: Vec<usize> = account
            .achievements
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.achieved && a.condition.is_met(account))
            .map(|(i, _)| i)
            .collect();

        for index in pending {
            let achievement = &mut account.achievements[index];
            achievement.achieved = true;
            achievement.achieved_at = Some(now);
            granted += achievement.points_reward;
            unlocked.push(achievement.title.clone());
            metrics::counter!("loyalty.achievements_unlocked").increment(1);
            info!(
                user_id = %account.user_id,
                achievement = %achievement.title,
                reward = achievement.points_reward,
                "Achievement unlocked"
            );
        }

        (granted, unlocked)
    }
}

/// Human-readable redemption code, generated only at redemption time.
fn redemption_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();
    format!("VR-{suffix}")
}
