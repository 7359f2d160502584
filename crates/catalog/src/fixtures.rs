//! Demo fixture data. Created once at process start, immutable thereafter.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use velvet_core::catalog::{AddOn, Experience, MenuExtra, MenuItem};
use velvet_core::coupon::{Coupon, DiscountKind};
use velvet_core::types::{BookingType, MenuCategory, OrderType, SelectionScope};

fn money(units: i64, cents: u32) -> Decimal {
    Decimal::new(units * 100 + cents as i64, 2)
}

const VIP_SCOPES: [SelectionScope; 2] = [
    SelectionScope::Booking(BookingType::VipCouch),
    SelectionScope::Booking(BookingType::VipBooth),
];

fn all_booking_scopes() -> Vec<SelectionScope> {
    BookingType::ALL.into_iter().map(SelectionScope::Booking).collect()
}

fn all_order_scopes() -> Vec<SelectionScope> {
    OrderType::ALL.into_iter().map(SelectionScope::Order).collect()
}

/// Seed the demo catalog: add-ons, experiences, menu, extras, coupons.
pub fn seed(store: &crate::CatalogStore) {
    seed_add_ons(store);
    seed_experiences(store);
    seed_menu(store);
    seed_extras(store);
    seed_coupons(store);
}

fn seed_add_ons(store: &crate::CatalogStore) {
    let vip = vec![BookingType::VipCouch, BookingType::VipBooth];
    store.insert_add_on(AddOn {
        id: "addon-sparklers".into(),
        name: "Bottle Sparklers".into(),
        price: money(25, 0),
        applies_to: vip.clone(),
        available: true,
        popular: true,
    });
    store.insert_add_on(AddOn {
        id: "addon-welcome-shots".into(),
        name: "Welcome Shot Round".into(),
        price: money(30, 0),
        applies_to: BookingType::ALL.to_vec(),
        available: true,
        popular: true,
    });
    store.insert_add_on(AddOn {
        id: "addon-photographer".into(),
        name: "Event Photographer".into(),
        price: money(150, 0),
        applies_to: vec![
            BookingType::PrivateRoom,
            BookingType::VipCouch,
            BookingType::VipBooth,
        ],
        available: true,
        popular: false,
    });
    store.insert_add_on(AddOn {
        id: "addon-decor".into(),
        name: "Celebration Decor".into(),
        price: money(45, 0),
        applies_to: vec![
            BookingType::Terrace,
            BookingType::PrivateRoom,
            BookingType::VipBooth,
        ],
        available: true,
        popular: false,
    });
    store.insert_add_on(AddOn {
        id: "addon-priority-entry".into(),
        name: "Priority Entry".into(),
        price: money(20, 0),
        applies_to: vec![
            BookingType::StandardTable,
            BookingType::BarHighTop,
            BookingType::Terrace,
        ],
        available: true,
        popular: true,
    });
    // Retired item kept in the catalog so old selections resolve by id but
    // never price in.
    store.insert_add_on(AddOn {
        id: "addon-cake-service".into(),
        name: "Cake Service".into(),
        price: money(35, 0),
        applies_to: BookingType::ALL.to_vec(),
        available: false,
        popular: false,
    });
}

fn seed_experiences(store: &crate::CatalogStore) {
    store.insert_experience(Experience {
        id: "exp-mixology".into(),
        name: "Mixology Masterclass".into(),
        price: money(120, 0),
        applies_to: vec![
            BookingType::PrivateRoom,
            BookingType::VipCouch,
            BookingType::VipBooth,
        ],
        available: true,
        popular: true,
    });
    store.insert_experience(Experience {
        id: "exp-chefs-tasting".into(),
        name: "Chef's Tasting Flight".into(),
        price: money(95, 0),
        applies_to: vec![BookingType::StandardTable, BookingType::PrivateRoom],
        available: true,
        popular: false,
    });
    store.insert_experience(Experience {
        id: "exp-dj-meet".into(),
        name: "DJ Booth Meet & Greet".into(),
        price: money(60, 0),
        applies_to: vec![BookingType::VipCouch, BookingType::VipBooth],
        available: true,
        popular: false,
    });
    store.insert_experience(Experience {
        id: "exp-cellar-tour".into(),
        name: "Cellar Tour".into(),
        price: money(40, 0),
        applies_to: vec![
            BookingType::StandardTable,
            BookingType::Terrace,
            BookingType::PrivateRoom,
        ],
        available: true,
        popular: false,
    });
}

fn seed_menu(store: &crate::CatalogStore) {
    let dine_and_bar = vec![OrderType::DineIn, OrderType::BarTab];
    store.insert_menu_item(MenuItem {
        id: "item-truffle-fries".into(),
        name: "Truffle Fries".into(),
        price: money(14, 0),
        category: MenuCategory::SmallPlates,
        order_types: dine_and_bar.clone(),
        available: true,
        popular: true,
    });
    store.insert_menu_item(MenuItem {
        id: "item-sliders".into(),
        name: "Short-Rib Sliders".into(),
        price: money(16, 50),
        category: MenuCategory::SmallPlates,
        order_types: OrderType::ALL.to_vec(),
        available: true,
        popular: false,
    });
    store.insert_menu_item(MenuItem {
        id: "item-wagyu-burger".into(),
        name: "Wagyu Burger".into(),
        price: money(28, 0),
        category: MenuCategory::Mains,
        order_types: vec![OrderType::DineIn, OrderType::Takeaway],
        available: true,
        popular: true,
    });
    store.insert_menu_item(MenuItem {
        id: "item-seabass".into(),
        name: "Chilean Sea Bass".into(),
        price: money(34, 0),
        category: MenuCategory::Mains,
        order_types: vec![OrderType::DineIn],
        available: true,
        popular: false,
    });
    store.insert_menu_item(MenuItem {
        id: "item-basque-cheesecake".into(),
        name: "Basque Cheesecake".into(),
        price: money(12, 0),
        category: MenuCategory::Desserts,
        order_types: vec![OrderType::DineIn, OrderType::Takeaway],
        available: true,
        popular: false,
    });
    store.insert_menu_item(MenuItem {
        id: "item-espresso-martini".into(),
        name: "Espresso Martini".into(),
        price: money(16, 0),
        category: MenuCategory::Cocktails,
        order_types: dine_and_bar.clone(),
        available: true,
        popular: true,
    });
    store.insert_menu_item(MenuItem {
        id: "item-velvet-spritz".into(),
        name: "Velvet Spritz".into(),
        price: money(15, 0),
        category: MenuCategory::Cocktails,
        order_types: dine_and_bar.clone(),
        available: true,
        popular: false,
    });
    store.insert_menu_item(MenuItem {
        id: "item-citrus-cooler".into(),
        name: "Citrus Cooler".into(),
        price: money(8, 0),
        category: MenuCategory::SoftDrinks,
        order_types: OrderType::ALL.to_vec(),
        available: true,
        popular: false,
    });
    store.insert_menu_item(MenuItem {
        id: "item-reserve-vodka".into(),
        name: "Reserve Vodka Bottle".into(),
        price: money(320, 0),
        category: MenuCategory::BottleService,
        order_types: vec![OrderType::BarTab],
        available: true,
        popular: true,
    });
    store.insert_menu_item(MenuItem {
        id: "item-champagne-magnum".into(),
        name: "Champagne Magnum".into(),
        price: money(450, 0),
        category: MenuCategory::BottleService,
        order_types: vec![OrderType::BarTab],
        available: true,
        popular: false,
    });
}

fn seed_extras(store: &crate::CatalogStore) {
    store.insert_menu_extra(MenuExtra {
        id: "extra-premium-mixer".into(),
        name: "Premium Mixer".into(),
        price: money(4, 50),
        categories: vec![MenuCategory::Cocktails, MenuCategory::BottleService],
        available: true,
    });
    store.insert_menu_extra(MenuExtra {
        id: "extra-truffle-shavings".into(),
        name: "Truffle Shavings".into(),
        price: money(6, 0),
        categories: vec![MenuCategory::SmallPlates, MenuCategory::Mains],
        available: true,
    });
    store.insert_menu_extra(MenuExtra {
        id: "extra-vegan-patty".into(),
        name: "Vegan Patty Swap".into(),
        price: money(3, 50),
        categories: vec![MenuCategory::Mains],
        available: true,
    });
    store.insert_menu_extra(MenuExtra {
        id: "extra-oat-milk".into(),
        name: "Oat Milk".into(),
        price: money(1, 0),
        categories: vec![MenuCategory::SoftDrinks, MenuCategory::Cocktails],
        available: true,
    });
    store.insert_menu_extra(MenuExtra {
        id: "extra-sparkler-garnish".into(),
        name: "Sparkler Garnish".into(),
        price: money(2, 50),
        categories: vec![MenuCategory::Cocktails],
        available: false,
    });
}

fn seed_coupons(store: &crate::CatalogStore) {
    store.insert_coupon(
        Coupon::new(
            "coupon-vip20",
            "VIP20",
            DiscountKind::Percentage,
            Decimal::from(20),
            VIP_SCOPES.to_vec(),
            Some(money(150, 0)),
            None,
        )
        .expect("fixture coupon VIP20 is valid"),
    );
    store.insert_coupon(
        Coupon::new(
            "coupon-welcome10",
            "WELCOME10",
            DiscountKind::Fixed,
            Decimal::from(10),
            all_booking_scopes()
                .into_iter()
                .chain(all_order_scopes())
                .collect(),
            None,
            None,
        )
        .expect("fixture coupon WELCOME10 is valid"),
    );
    store.insert_coupon(
        Coupon::new(
            "coupon-happyhour15",
            "HAPPYHOUR15",
            DiscountKind::Percentage,
            Decimal::from(15),
            vec![
                SelectionScope::Order(OrderType::DineIn),
                SelectionScope::Order(OrderType::BarTab),
            ],
            None,
            None,
        )
        .expect("fixture coupon HAPPYHOUR15 is valid"),
    );
    // Last season's promo, kept so stale codes resolve to Expired instead of
    // NotFound.
    store.insert_coupon(
        Coupon::new(
            "coupon-summer25",
            "SUMMER25",
            DiscountKind::Percentage,
            Decimal::from(25),
            all_booking_scopes(),
            None,
            NaiveDate::from_ymd_opt(2025, 8, 31),
        )
        .expect("fixture coupon SUMMER25 is valid"),
    );
    store.insert_coupon(
        Coupon::new(
            "coupon-bignight50",
            "BIGNIGHT50",
            DiscountKind::Fixed,
            Decimal::from(50),
            vec![
                SelectionScope::Booking(BookingType::PrivateRoom),
                SelectionScope::Booking(BookingType::VipCouch),
                SelectionScope::Booking(BookingType::VipBooth),
            ],
            Some(money(300, 0)),
            None,
        )
        .expect("fixture coupon BIGNIGHT50 is valid"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogStore;
    use rust_decimal_macros::dec;

    #[test]
    fn test_seeded_counts() {
        let store = CatalogStore::with_fixtures();
        assert!(store.coupon_by_code("VIP20").is_some());
        assert!(store.coupon_by_code("WELCOME10").is_some());
        assert!(store.coupon_by_code("SUMMER25").is_some());
        assert!(store.add_on("addon-sparklers").is_some());
        assert!(store.experience("exp-mixology").is_some());
        assert!(store.menu_item("item-espresso-martini").is_some());
        assert!(store.menu_extra("extra-premium-mixer").is_some());
    }

    #[test]
    fn test_vip20_terms() {
        let store = CatalogStore::with_fixtures();
        let coupon = store.coupon_by_code("VIP20").unwrap();
        assert_eq!(coupon.kind, DiscountKind::Percentage);
        assert_eq!(coupon.value, dec!(20));
        assert_eq!(coupon.min_spend, Some(dec!(150)));
        assert!(coupon.applies_to(SelectionScope::Booking(BookingType::VipCouch)));
        assert!(!coupon.applies_to(SelectionScope::Booking(BookingType::StandardTable)));
    }

    #[test]
    fn test_retired_add_on_not_in_views() {
        let store = CatalogStore::with_fixtures();
        assert!(store.add_on("addon-cake-service").is_some());
        for booking_type in BookingType::ALL {
            assert!(store
                .add_ons_for(booking_type)
                .iter()
                .all(|a| a.id != "addon-cake-service"));
        }
    }
}
