//! Booking and ordering discriminators — the exhaustive enumerations every
//! rate lookup and applicability check is keyed by.
//!
//! The source data model keyed these tables by free-form strings; here an
//! unrecognized discriminator is a parse error at the edge instead of a
//! silent zero deep inside a price computation.

use crate::error::{VelvetError, VelvetResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Booking Types ──────────────────────────────────────────────────────────

/// Table categories a guest can book. Standard dining seats carry no cover
/// charge; premium and VIP placements charge a flat per-guest rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    StandardTable,
    BarHighTop,
    Terrace,
    PrivateRoom,
    VipCouch,
    VipBooth,
}

impl BookingType {
    pub const ALL: [BookingType; 6] = [
        BookingType::StandardTable,
        BookingType::BarHighTop,
        BookingType::Terrace,
        BookingType::PrivateRoom,
        BookingType::VipCouch,
        BookingType::VipBooth,
    ];

    /// Flat per-guest cover charge for this booking type.
    pub fn cover_charge(&self) -> Decimal {
        match self {
            BookingType::StandardTable => Decimal::ZERO,
            BookingType::BarHighTop => Decimal::ZERO,
            BookingType::Terrace => Decimal::ZERO,
            BookingType::PrivateRoom => Decimal::from(40),
            BookingType::VipCouch => Decimal::from(75),
            BookingType::VipBooth => Decimal::from(120),
        }
    }

    /// Whether this placement counts as VIP for coupon scoping and perks.
    pub fn is_vip(&self) -> bool {
        matches!(self, BookingType::VipCouch | BookingType::VipBooth)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingType::StandardTable => "Standard Table",
            BookingType::BarHighTop => "Bar High-Top",
            BookingType::Terrace => "Terrace",
            BookingType::PrivateRoom => "Private Room",
            BookingType::VipCouch => "VIP Couch",
            BookingType::VipBooth => "VIP Booth",
        }
    }
}

impl FromStr for BookingType {
    type Err = VelvetError;

    fn from_str(s: &str) -> VelvetResult<Self> {
        match s {
            "standard_table" => Ok(BookingType::StandardTable),
            "bar_high_top" => Ok(BookingType::BarHighTop),
            "terrace" => Ok(BookingType::Terrace),
            "private_room" => Ok(BookingType::PrivateRoom),
            "vip_couch" => Ok(BookingType::VipCouch),
            "vip_booth" => Ok(BookingType::VipBooth),
            other => Err(VelvetError::Validation(format!(
                "unknown booking type: {other}"
            ))),
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Order Types ────────────────────────────────────────────────────────────

/// How an in-venue order is fulfilled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    BarTab,
    Takeaway,
}

impl OrderType {
    pub const ALL: [OrderType; 3] = [OrderType::DineIn, OrderType::BarTab, OrderType::Takeaway];

    pub fn label(&self) -> &'static str {
        match self {
            OrderType::DineIn => "Dine-In",
            OrderType::BarTab => "Bar Tab",
            OrderType::Takeaway => "Takeaway",
        }
    }
}

impl FromStr for OrderType {
    type Err = VelvetError;

    fn from_str(s: &str) -> VelvetResult<Self> {
        match s {
            "dine_in" => Ok(OrderType::DineIn),
            "bar_tab" => Ok(OrderType::BarTab),
            "takeaway" => Ok(OrderType::Takeaway),
            other => Err(VelvetError::Validation(format!(
                "unknown order type: {other}"
            ))),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Selection Scope ────────────────────────────────────────────────────────

/// Unified discriminator for anything that is scoped to "which kind of
/// selection is this" — today that is coupon applicability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SelectionScope {
    Booking(BookingType),
    Order(OrderType),
}

impl fmt::Display for SelectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionScope::Booking(bt) => write!(f, "booking/{bt}"),
            SelectionScope::Order(ot) => write!(f, "order/{ot}"),
        }
    }
}

// ─── Menu Categories ────────────────────────────────────────────────────────

/// Menu sections items and per-item extras are organized under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    SmallPlates,
    Mains,
    Desserts,
    SoftDrinks,
    Cocktails,
    BottleService,
}

impl MenuCategory {
    pub const ALL: [MenuCategory; 6] = [
        MenuCategory::SmallPlates,
        MenuCategory::Mains,
        MenuCategory::Desserts,
        MenuCategory::SoftDrinks,
        MenuCategory::Cocktails,
        MenuCategory::BottleService,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuCategory::SmallPlates => "Small Plates",
            MenuCategory::Mains => "Mains",
            MenuCategory::Desserts => "Desserts",
            MenuCategory::SoftDrinks => "Soft Drinks",
            MenuCategory::Cocktails => "Cocktails",
            MenuCategory::BottleService => "Bottle Service",
        }
    }
}

// ─── Contact Info ───────────────────────────────────────────────────────────

/// Who the booking is held under.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cover_charge_table() {
        assert_eq!(BookingType::StandardTable.cover_charge(), Decimal::ZERO);
        assert_eq!(BookingType::Terrace.cover_charge(), Decimal::ZERO);
        assert_eq!(BookingType::VipCouch.cover_charge(), dec!(75));
        assert_eq!(BookingType::VipBooth.cover_charge(), dec!(120));
    }

    #[test]
    fn test_booking_type_parse_roundtrip() {
        for bt in BookingType::ALL {
            let json = serde_json::to_string(&bt).unwrap();
            let back: BookingType = serde_json::from_str(&json).unwrap();
            assert_eq!(bt, back);
        }
        assert_eq!(
            "vip_couch".parse::<BookingType>().unwrap(),
            BookingType::VipCouch
        );
    }

    #[test]
    fn test_booking_type_parse_rejects_unknown() {
        let err = "vip_cabana".parse::<BookingType>().unwrap_err();
        assert!(matches!(err, VelvetError::Validation(_)));
    }

    #[test]
    fn test_vip_classification() {
        assert!(BookingType::VipCouch.is_vip());
        assert!(BookingType::VipBooth.is_vip());
        assert!(!BookingType::PrivateRoom.is_vip());
        assert!(!BookingType::StandardTable.is_vip());
    }

    #[test]
    fn test_scope_display() {
        let scope = SelectionScope::Booking(BookingType::VipCouch);
        assert_eq!(scope.to_string(), "booking/VIP Couch");
        let scope = SelectionScope::Order(OrderType::BarTab);
        assert_eq!(scope.to_string(), "order/Bar Tab");
    }
}
