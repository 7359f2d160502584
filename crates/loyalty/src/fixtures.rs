//! Starter achievement and reward inventory for a new account. Sample
//! business rules; thresholds are data the program can retune.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use velvet_core::loyalty::{Achievement, AchievementCondition, Reward};

pub fn starter_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "ach-first-night",
            "First Night Out",
            AchievementCondition::TotalVisits(1),
            25,
        ),
        Achievement::new(
            "ach-regular",
            "Regular",
            AchievementCondition::TotalVisits(5),
            75,
        ),
        Achievement::new(
            "ach-scene-explorer",
            "Scene Explorer",
            AchievementCondition::DistinctVenues(3),
            100,
        ),
        Achievement::new(
            "ach-big-spender",
            "Big Spender",
            AchievementCondition::LifetimeSpend(Decimal::from(1000)),
            150,
        ),
        Achievement::new(
            "ach-on-a-roll",
            "On a Roll",
            AchievementCondition::ConsecutiveTransactions(3),
            50,
        ),
        Achievement::new(
            "ach-point-collector",
            "Point Collector",
            AchievementCondition::LifetimePoints(2500),
            200,
        ),
    ]
}

pub fn starter_rewards() -> Vec<Reward> {
    vec![
        Reward::new("rw-house-cocktail", "House Cocktail", 150, None),
        Reward::new("rw-chefs-dessert", "Chef's Dessert", 200, None),
        Reward::new("rw-skip-line", "Skip-the-Line Pass", 250, None),
        Reward::new("rw-vip-upgrade", "VIP Table Upgrade", 600, None),
        Reward::new(
            "rw-bottle-credit",
            "Bottle Service Credit",
            1000,
            NaiveDate::from_ymd_opt(2026, 12, 31),
        ),
    ]
}
