use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub type VelvetResult<T> = Result<T, VelvetError>;

#[derive(Error, Debug)]
pub enum VelvetError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Coupon code not recognized: {0}")]
    CouponNotFound(String),

    #[error("Coupon {code} does not apply to {scope}")]
    CouponNotApplicable { code: String, scope: String },

    #[error("Coupon {code} requires a minimum spend of {required}, subtotal is {subtotal}")]
    BelowMinimumSpend {
        code: String,
        required: Decimal,
        subtotal: Decimal,
    },

    #[error("Coupon {code} expired on {expired_on}")]
    CouponExpired { code: String, expired_on: NaiveDate },

    #[error("Reward not found: {0}")]
    RewardNotFound(String),

    #[error("Insufficient points: need {required}, have {available}")]
    InsufficientPoints { required: u64, available: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
