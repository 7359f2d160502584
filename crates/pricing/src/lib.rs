pub mod engine;
pub mod resolver;

pub use engine::{BookingSelection, CartLine, OrderSelection, PricingEngine};
pub use resolver::{discount_amount, resolve_coupon, AppliedCoupon};
