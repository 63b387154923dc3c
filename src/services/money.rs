use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AppError, Result};

/// Convert a decimal currency string into integer minor units:
/// `round(value * 100)`, e.g. "6.49" -> 649. Money is never held as
/// floating point past this boundary.
pub fn to_minor_units(input: &str, field: &str) -> Result<i64> {
    let value: Decimal = input
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a decimal amount", field)))?;

    if value.is_sign_negative() {
        return Err(AppError::Validation(format!(
            "{} must not be negative",
            field
        )));
    }

    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| AppError::Validation(format!("{} is out of range", field)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::Validation(format!("{} is out of range", field)))
}
