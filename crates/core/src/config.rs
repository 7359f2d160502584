use crate::loyalty::Tier;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `VELVETROPE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_venue_id")]
    pub venue_id: String,
    #[serde(default = "default_venue_name")]
    pub venue_name: String,
    #[serde(default)]
    pub loyalty: LoyaltyConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

// ─── Loyalty Config ─────────────────────────────────────────────────────────

/// Points-award rates, the consecutive-visit window, and tier thresholds.
/// The business rules behind these are samples; the numbers are deliberately
/// configuration rather than invariants.
#[derive(Debug, Clone, Deserialize)]
pub struct LoyaltyConfig {
    #[serde(default = "default_loyalty_enabled")]
    pub enabled: bool,
    /// Flat award per completed transaction.
    #[serde(default = "default_base_points")]
    pub base_points_per_transaction: u64,
    /// Award per guest (bookings) or per item (orders).
    #[serde(default = "default_points_per_count")]
    pub points_per_count: u64,
    /// Award per currency unit spent; the spend component is floored.
    #[serde(default = "default_points_per_dollar")]
    pub points_per_dollar: Decimal,
    /// Bonus when the previous transaction falls inside the window.
    #[serde(default = "default_consecutive_bonus")]
    pub consecutive_bonus_points: u64,
    #[serde(default = "default_consecutive_window_days")]
    pub consecutive_window_days: i64,
    #[serde(default = "default_insider_threshold")]
    pub insider_threshold: u64,
    #[serde(default = "default_vip_threshold")]
    pub vip_threshold: u64,
    #[serde(default = "default_legend_threshold")]
    pub legend_threshold: u64,
}

impl LoyaltyConfig {
    /// Minimum current-points threshold for a tier.
    pub fn threshold(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Member => 0,
            Tier::Insider => self.insider_threshold,
            Tier::Vip => self.vip_threshold,
            Tier::Legend => self.legend_threshold,
        }
    }
}

fn default_loyalty_enabled() -> bool {
    true
}
fn default_base_points() -> u64 {
    10
}
fn default_points_per_count() -> u64 {
    5
}
fn default_points_per_dollar() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_consecutive_bonus() -> u64 {
    15
}
fn default_consecutive_window_days() -> i64 {
    30
}
fn default_insider_threshold() -> u64 {
    500
}
fn default_vip_threshold() -> u64 {
    1500
}
fn default_legend_threshold() -> u64 {
    4000
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            enabled: default_loyalty_enabled(),
            base_points_per_transaction: default_base_points(),
            points_per_count: default_points_per_count(),
            points_per_dollar: default_points_per_dollar(),
            consecutive_bonus_points: default_consecutive_bonus(),
            consecutive_window_days: default_consecutive_window_days(),
            insider_threshold: default_insider_threshold(),
            vip_threshold: default_vip_threshold(),
            legend_threshold: default_legend_threshold(),
        }
    }
}

// ─── Session Config ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_guests")]
    pub max_guests: u32,
    #[serde(default = "default_max_line_quantity")]
    pub max_line_quantity: u32,
}

fn default_max_guests() -> u32 {
    20
}
fn default_max_line_quantity() -> u32 {
    50
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_guests: default_max_guests(),
            max_line_quantity: default_max_line_quantity(),
        }
    }
}

fn default_venue_id() -> String {
    "velvet-room-downtown".to_string()
}
fn default_venue_name() -> String {
    "The Velvet Room".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            venue_id: default_venue_id(),
            venue_name: default_venue_name(),
            loyalty: LoyaltyConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("VELVETROPE")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
