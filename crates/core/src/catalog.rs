//! Catalog item types — the read-only reference data bookings and orders
//! select from. Prices are `Decimal` in major currency units with two
//! fractional digits.

use crate::types::{BookingType, MenuCategory, OrderType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable extra attached to a reservation (sparklers, welcome shots,
/// decoration packages). Priced once per booking, not per guest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Booking types this add-on can be attached to.
    pub applies_to: Vec<BookingType>,
    pub available: bool,
    pub popular: bool,
}

impl AddOn {
    pub fn applies_to(&self, booking_type: BookingType) -> bool {
        self.applies_to.contains(&booking_type)
    }
}

/// A hosted experience bundled into a booking (mixology class, chef's
/// tasting, DJ meet-and-greet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub applies_to: Vec<BookingType>,
    pub available: bool,
    pub popular: bool,
}

impl Experience {
    pub fn applies_to(&self, booking_type: BookingType) -> bool {
        self.applies_to.contains(&booking_type)
    }
}

/// An orderable menu item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub category: MenuCategory,
    /// Order types this item can be fulfilled through.
    pub order_types: Vec<OrderType>,
    pub available: bool,
    pub popular: bool,
}

impl MenuItem {
    pub fn orderable_via(&self, order_type: OrderType) -> bool {
        self.order_types.contains(&order_type)
    }
}

/// A per-item extra on a cart line (premium mixer, truffle shavings).
/// Priced once per unit of the line it is attached to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuExtra {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Menu categories this extra can be attached to.
    pub categories: Vec<MenuCategory>,
    pub available: bool,
}

impl MenuExtra {
    pub fn fits_category(&self, category: MenuCategory) -> bool {
        self.categories.contains(&category)
    }
}
