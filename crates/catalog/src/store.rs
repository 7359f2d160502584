//! Catalog store — in-memory reference data backed by `DashMap`. Populated
//! once at startup and read-only afterwards.

use dashmap::DashMap;
use tracing::info;
use velvet_core::catalog::{AddOn, Experience, MenuExtra, MenuItem};
use velvet_core::coupon::Coupon;
use velvet_core::types::{BookingType, MenuCategory, OrderType};

/// Keyed collections of everything a selection can reference. Lookups return
/// clones; absence is `None`, never an error — stale ids in a selection are
/// the caller's normal case, not a failure.
pub struct CatalogStore {
    add_ons: DashMap<String, AddOn>,
    experiences: DashMap<String, Experience>,
    menu_items: DashMap<String, MenuItem>,
    menu_extras: DashMap<String, MenuExtra>,
    /// Keyed by uppercased code for case-insensitive lookup.
    coupons: DashMap<String, Coupon>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            add_ons: DashMap::new(),
            experiences: DashMap::new(),
            menu_items: DashMap::new(),
            menu_extras: DashMap::new(),
            coupons: DashMap::new(),
        }
    }

    /// Create a store seeded with the demo fixture data.
    pub fn with_fixtures() -> Self {
        let store = Self::new();
        crate::fixtures::seed(&store);
        info!(
            add_ons = store.add_ons.len(),
            experiences = store.experiences.len(),
            menu_items = store.menu_items.len(),
            menu_extras = store.menu_extras.len(),
            coupons = store.coupons.len(),
            "Catalog seeded"
        );
        store
    }

    // ── loading (fixture/startup time only) ──

    pub fn insert_add_on(&self, add_on: AddOn) {
        self.add_ons.insert(add_on.id.clone(), add_on);
    }

    pub fn insert_experience(&self, experience: Experience) {
        self.experiences.insert(experience.id.clone(), experience);
    }

    pub fn insert_menu_item(&self, item: MenuItem) {
        self.menu_items.insert(item.id.clone(), item);
    }

    pub fn insert_menu_extra(&self, extra: MenuExtra) {
        self.menu_extras.insert(extra.id.clone(), extra);
    }

    pub fn insert_coupon(&self, coupon: Coupon) {
        self.coupons.insert(coupon.code.to_uppercase(), coupon);
    }

    // ── lookups ──

    pub fn add_on(&self, id: &str) -> Option<AddOn> {
        self.add_ons.get(id).map(|e| e.clone())
    }

    pub fn experience(&self, id: &str) -> Option<Experience> {
        self.experiences.get(id).map(|e| e.clone())
    }

    pub fn menu_item(&self, id: &str) -> Option<MenuItem> {
        self.menu_items.get(id).map(|e| e.clone())
    }

    pub fn menu_extra(&self, id: &str) -> Option<MenuExtra> {
        self.menu_extras.get(id).map(|e| e.clone())
    }

    /// Case-insensitive coupon lookup by code.
    pub fn coupon_by_code(&self, code: &str) -> Option<Coupon> {
        self.coupons.get(&code.to_uppercase()).map(|e| e.clone())
    }

    // ── filtered views for the presentation layer ──

    /// Available add-ons attachable to the given booking type, popular first.
    pub fn add_ons_for(&self, booking_type: BookingType) -> Vec<AddOn> {
        let mut out: Vec<AddOn> = self
            .add_ons
            .iter()
            .filter(|e| e.available && e.applies_to(booking_type))
            .map(|e| e.clone())
            .collect();
        out.sort_by(|a, b| b.popular.cmp(&a.popular).then(a.name.cmp(&b.name)));
        out
    }

    /// Available experiences for the given booking type, popular first.
    pub fn experiences_for(&self, booking_type: BookingType) -> Vec<Experience> {
        let mut out: Vec<Experience> = self
            .experiences
            .iter()
            .filter(|e| e.available && e.applies_to(booking_type))
            .map(|e| e.clone())
            .collect();
        out.sort_by(|a, b| b.popular.cmp(&a.popular).then(a.name.cmp(&b.name)));
        out
    }

    /// Available menu items in a category, orderable via the given order type.
    pub fn menu_for(&self, category: MenuCategory, order_type: OrderType) -> Vec<MenuItem> {
        let mut out: Vec<MenuItem> = self
            .menu_items
            .iter()
            .filter(|e| e.available && e.category == category && e.orderable_via(order_type))
            .map(|e| e.clone())
            .collect();
        out.sort_by(|a, b| b.popular.cmp(&a.popular).then(a.name.cmp(&b.name)));
        out
    }

    /// Available extras attachable to items of the given category.
    pub fn extras_for(&self, category: MenuCategory) -> Vec<MenuExtra> {
        let mut out: Vec<MenuExtra> = self
            .menu_extras
            .iter()
            .filter(|e| e.available && e.fits_category(category))
            .map(|e| e.clone())
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_lookup_is_case_insensitive() {
        let store = CatalogStore::with_fixtures();
        let upper = store.coupon_by_code("VIP20");
        let lower = store.coupon_by_code("vip20");
        let mixed = store.coupon_by_code("Vip20");
        assert!(upper.is_some());
        assert_eq!(upper, lower);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn test_unknown_ids_are_none() {
        let store = CatalogStore::with_fixtures();
        assert!(store.add_on("addon-nonexistent").is_none());
        assert!(store.menu_item("item-nonexistent").is_none());
        assert!(store.coupon_by_code("NOSUCHCODE").is_none());
    }

    #[test]
    fn test_filtered_views_respect_availability() {
        let store = CatalogStore::with_fixtures();
        for booking_type in BookingType::ALL {
            for add_on in store.add_ons_for(booking_type) {
                assert!(add_on.available);
                assert!(add_on.applies_to(booking_type));
            }
        }
    }

    #[test]
    fn test_popular_items_sort_first() {
        let store = CatalogStore::with_fixtures();
        let add_ons = store.add_ons_for(BookingType::VipCouch);
        assert!(!add_ons.is_empty());
        let first_unpopular = add_ons.iter().position(|a| !a.popular);
        if let Some(pos) = first_unpopular {
            assert!(
                add_ons[pos..].iter().all(|a| !a.popular),
                "popular add-ons must precede unpopular ones"
            );
        }
    }
}
