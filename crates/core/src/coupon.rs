//! Coupon domain type. A coupon discounts a whole selection; the resolver
//! in velvet-pricing decides whether one applies.

use crate::error::{VelvetError, VelvetResult};
use crate::types::SelectionScope;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a coupon's value is interpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Value is a percentage of the subtotal, in (0, 100].
    Percentage,
    /// Value is a flat amount, clamped to the subtotal at application time.
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    pub id: String,
    /// Matched case-insensitively; stored as entered.
    pub code: String,
    pub kind: DiscountKind,
    pub value: Decimal,
    /// Selection kinds the coupon is valid for.
    pub scopes: Vec<SelectionScope>,
    pub min_spend: Option<Decimal>,
    pub expires: Option<NaiveDate>,
}

impl Coupon {
    /// Construct a coupon, rejecting out-of-range values up front:
    /// percentage must be in (0, 100], fixed must be non-negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        kind: DiscountKind,
        value: Decimal,
        scopes: Vec<SelectionScope>,
        min_spend: Option<Decimal>,
        expires: Option<NaiveDate>,
    ) -> VelvetResult<Self> {
        match kind {
            DiscountKind::Percentage => {
                if value <= Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                    return Err(VelvetError::Validation(format!(
                        "percentage coupon value must be in (0, 100], got {value}"
                    )));
                }
            }
            DiscountKind::Fixed => {
                if value < Decimal::ZERO {
                    return Err(VelvetError::Validation(format!(
                        "fixed coupon value must be non-negative, got {value}"
                    )));
                }
            }
        }
        if let Some(min) = min_spend {
            if min < Decimal::ZERO {
                return Err(VelvetError::Validation(format!(
                    "minimum spend must be non-negative, got {min}"
                )));
            }
        }
        Ok(Self {
            id: id.into(),
            code: code.into(),
            kind,
            value,
            scopes,
            min_spend,
            expires,
        })
    }

    pub fn applies_to(&self, scope: SelectionScope) -> bool {
        self.scopes.contains(&scope)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires.map(|e| today > e).unwrap_or(false)
    }
}
