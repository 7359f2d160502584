//! Loyalty domain types — tier ladder, per-user account state, achievements,
//! venue visit stats, and redeemable rewards.
//!
//! - Four-tier ladder: Member → Insider → VIP → Legend, driven by the
//!   configured point thresholds (tier is derived from current points, never
//!   set directly)
//! - Achievements grant their point reward exactly once
//! - Rewards move from available to redeemed atomically, with a redemption
//!   code generated only at redemption time

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ─── Tier Ladder ────────────────────────────────────────────────────────────

/// Loyalty tier levels with escalating perks. Ordering follows declaration
/// order, lowest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Member,
    Insider,
    Vip,
    Legend,
}

impl Tier {
    /// Lowest to highest.
    pub const ALL: [Tier; 4] = [Tier::Member, Tier::Insider, Tier::Vip, Tier::Legend];

    /// The tier above this one, if any.
    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Member => Some(Tier::Insider),
            Tier::Insider => Some(Tier::Vip),
            Tier::Vip => Some(Tier::Legend),
            Tier::Legend => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Member => "Member",
            Tier::Insider => "Insider",
            Tier::Vip => "VIP",
            Tier::Legend => "Legend",
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Member
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Transactions ───────────────────────────────────────────────────────────

/// What kind of completed purchase a transaction came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Booking,
    VenueOrder,
}

/// A completed transaction reported to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub venue_id: String,
    pub venue_name: String,
    pub amount_spent: Decimal,
    /// Guest count for bookings, item count for orders.
    pub count: u32,
    pub transaction_type: TransactionType,
}

/// Per-component decomposition of the points earned by one transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointsBreakdown {
    pub base_points: u64,
    pub count_points: u64,
    pub spend_points: u64,
    pub consecutive_bonus: u64,
    pub achievement_points: u64,
    pub total: u64,
    /// Titles of achievements unlocked by this transaction.
    pub unlocked: Vec<String>,
    pub tier_after: Tier,
    pub tier_changed: bool,
}

// ─── Achievements ───────────────────────────────────────────────────────────

/// Condition an achievement is granted for, evaluated against the account
/// state after each transaction. Thresholds are data, not code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "condition", content = "threshold")]
pub enum AchievementCondition {
    TotalVisits(u32),
    DistinctVenues(u32),
    LifetimeSpend(Decimal),
    LifetimePoints(u64),
    ConsecutiveTransactions(u32),
}

impl AchievementCondition {
    /// Whether the account currently satisfies this condition.
    pub fn is_met(&self, account: &LoyaltyAccount) -> bool {
        match *self {
            AchievementCondition::TotalVisits(n) => account.total_visits() >= n,
            AchievementCondition::DistinctVenues(n) => account.distinct_venues() >= n,
            AchievementCondition::LifetimeSpend(amount) => account.total_spent() >= amount,
            AchievementCondition::LifetimePoints(n) => account.lifetime_points >= n,
            AchievementCondition::ConsecutiveTransactions(n) => {
                account.consecutive_transactions >= n
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub condition: AchievementCondition,
    pub points_reward: u64,
    pub achieved: bool,
    /// Set once when first granted, immutable afterwards.
    pub achieved_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        condition: AchievementCondition,
        points_reward: u64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            condition,
            points_reward,
            achieved: false,
            achieved_at: None,
        }
    }
}

// ─── Venue Stats ────────────────────────────────────────────────────────────

/// Per-venue visit history for one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VenueStat {
    pub venue_id: String,
    pub venue_name: String,
    pub visits: u32,
    pub total_spent: Decimal,
    pub last_visit: DateTime<Utc>,
}

// ─── Rewards ────────────────────────────────────────────────────────────────

/// A redeemable reward in the user's inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub point_cost: u64,
    pub expires: Option<NaiveDate>,
    pub redeemed: bool,
    /// Generated only at redemption time, unique per redemption.
    pub redemption_code: Option<String>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl Reward {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        point_cost: u64,
        expires: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            point_cost,
            expires,
            redeemed: false,
            redemption_code: None,
            redeemed_at: None,
        }
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires.map(|e| today > e).unwrap_or(false)
    }
}

// ─── Loyalty Account ────────────────────────────────────────────────────────

/// Complete loyalty state for a single user session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    pub user_id: String,
    pub current_points: u64,
    /// Monotonically non-decreasing; spending points never reduces it.
    pub lifetime_points: u64,
    pub tier: Tier,
    pub joined: DateTime<Utc>,
    pub achievements: Vec<Achievement>,
    pub venue_stats: Vec<VenueStat>,
    pub available_rewards: Vec<Reward>,
    pub redeemed_rewards: Vec<Reward>,
    pub last_transaction: Option<DateTime<Utc>>,
    pub consecutive_transactions: u32,
}

impl LoyaltyAccount {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            current_points: 0,
            lifetime_points: 0,
            tier: Tier::Member,
            joined: Utc::now(),
            achievements: Vec::new(),
            venue_stats: Vec::new(),
            available_rewards: Vec::new(),
            redeemed_rewards: Vec::new(),
            last_transaction: None,
            consecutive_transactions: 0,
        }
    }

    /// Visits summed across all venues.
    pub fn total_visits(&self) -> u32 {
        self.venue_stats.iter().map(|s| s.visits).sum()
    }

    /// Number of distinct venues ever visited.
    pub fn distinct_venues(&self) -> u32 {
        self.venue_stats
            .iter()
            .map(|s| s.venue_id.as_str())
            .collect::<HashSet<_>>()
            .len() as u32
    }

    /// Lifetime spend summed across all venues.
    pub fn total_spent(&self) -> Decimal {
        self.venue_stats.iter().map(|s| s.total_spent).sum()
    }

    pub fn days_since_last_transaction(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_transaction.map(|t| (now - t).num_days())
    }
}
