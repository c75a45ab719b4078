use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::CapGainsError;
use crate::types::{Money, Rate};
use crate::CapGainsResult;

/// Compound annual growth rate: `(end / begin)^(1 / years) - 1`.
///
/// Degenerate inputs never produce NaN-like values: a non-positive `begin`
/// or `years` yields 0, and a non-positive `end` yields -1 (total loss).
pub fn cagr(begin: Money, end: Money, years: Decimal) -> Rate {
    if begin <= Decimal::ZERO || years <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if end <= Decimal::ZERO {
        return dec!(-1);
    }
    if end == begin {
        return Decimal::ZERO;
    }

    let ratio = end / begin;
    match ratio.checked_powd(Decimal::ONE / years) {
        Some(growth) => growth - Decimal::ONE,
        None => Decimal::ZERO,
    }
}

/// Future value of a lump sum compounding annually for whole years.
pub fn compound_value(principal: Money, rate: Rate, years: u32) -> CapGainsResult<Money> {
    if rate <= dec!(-1) {
        return Err(CapGainsError::InvalidInput {
            field: "rate".into(),
            reason: "Growth rate must be greater than -100%".into(),
        });
    }

    let factor = (Decimal::ONE + rate)
        .checked_powu(years as u64)
        .ok_or_else(|| CapGainsError::InvalidInput {
            field: "years".into(),
            reason: format!("Compounding {rate} over {years} years overflows"),
        })?;
    principal
        .checked_mul(factor)
        .ok_or_else(|| CapGainsError::InvalidInput {
            field: "principal".into(),
            reason: format!("Compounding {principal} at {rate} over {years} years overflows"),
        })
}

/// Simple (non-compounding) interest accrued on a principal.
pub fn simple_interest(principal: Money, rate: Rate, years: u32) -> Money {
    principal * rate * Decimal::from(years)
}
