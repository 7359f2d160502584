//! Coupon resolver — validates a coupon code against the current selection
//! and either yields the discount amount or a typed rejection.
//!
//! Rules run in a fixed order, first failure wins:
//! 1. code resolves in the catalog (case-insensitive)
//! 2. coupon is scoped to the selection's discriminator
//! 3. subtotal meets the minimum spend, if any
//! 4. coupon has not expired, if it has an expiry

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;
use velvet_catalog::CatalogStore;
use velvet_core::coupon::DiscountKind;
use velvet_core::types::SelectionScope;
use velvet_core::{VelvetError, VelvetResult};

/// A successfully resolved coupon with its discount against a subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedCoupon {
    pub code: String,
    pub kind: DiscountKind,
    pub discount: Decimal,
}

/// Discount kernel shared by every money path: percentages round half-up to
/// the currency minor unit, fixed amounts clamp to the subtotal. Result is
/// always in [0, subtotal].
pub fn discount_amount(kind: DiscountKind, value: Decimal, subtotal: Decimal) -> Decimal {
    match kind {
        DiscountKind::Percentage => (subtotal * value / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .min(subtotal),
        DiscountKind::Fixed => value.min(subtotal),
    }
}

/// Validate `code` against the selection scope and subtotal, returning the
/// discount it grants. The selection itself is untouched; callers decide
/// whether to store the code.
pub fn resolve_coupon(
    catalog: &CatalogStore,
    code: &str,
    scope: SelectionScope,
    subtotal: Decimal,
    today: NaiveDate,
) -> VelvetResult<AppliedCoupon> {
    let Some(coupon) = catalog.coupon_by_code(code) else {
        metrics::counter!("pricing.coupons_rejected").increment(1);
        return Err(VelvetError::CouponNotFound(code.to_string()));
    };

    if !coupon.applies_to(scope) {
        metrics::counter!("pricing.coupons_rejected").increment(1);
        return Err(VelvetError::CouponNotApplicable {
            code: coupon.code.clone(),
            scope: scope.to_string(),
        });
    }

    if let Some(required) = coupon.min_spend {
        if subtotal < required {
            metrics::counter!("pricing.coupons_rejected").increment(1);
            return Err(VelvetError::BelowMinimumSpend {
                code: coupon.code.clone(),
                required,
                subtotal,
            });
        }
    }

    if let Some(expired_on) = coupon.expires {
        if today > expired_on {
            metrics::counter!("pricing.coupons_rejected").increment(1);
            return Err(VelvetError::CouponExpired {
                code: coupon.code.clone(),
                expired_on,
            });
        }
    }

    let discount = discount_amount(coupon.kind, coupon.value, subtotal);
    metrics::counter!("pricing.coupons_applied").increment(1);
    debug!(
        code = %coupon.code,
        %subtotal,
        %discount,
        "Coupon resolved"
    );

    Ok(AppliedCoupon {
        code: coupon.code,
        kind: coupon.kind,
        discount,
    })
}
