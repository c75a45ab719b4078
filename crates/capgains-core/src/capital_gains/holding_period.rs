use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CapGainsError;
use crate::CapGainsResult;

/// Elapsed ownership between purchase and sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingPeriod {
    /// Whole calendar months held
    pub months: u32,
    pub years: u32,
    pub remainder_months: u32,
    pub days: i64,
    pub is_long_term: bool,
}

/// Classify the holding period for immovable property.
///
/// A month counts once its day-of-month is reached, so 2022-01-01 to
/// 2024-01-01 is exactly 24 months while 2022-01-01 to 2023-12-31 is 23.
pub fn classify_holding_period(
    purchase_date: NaiveDate,
    sale_date: NaiveDate,
    long_term_threshold_months: u32,
) -> CapGainsResult<HoldingPeriod> {
    if sale_date <= purchase_date {
        return Err(CapGainsError::InvalidInput {
            field: "sale_date".into(),
            reason: "Holding period must be positive".into(),
        });
    }

    let months = whole_months_between(purchase_date, sale_date);
    let holding = HoldingPeriod {
        months,
        years: months / 12,
        remainder_months: months % 12,
        days: (sale_date - purchase_date).num_days(),
        is_long_term: months >= long_term_threshold_months,
    };

    tracing::debug!(
        months = holding.months,
        long_term = holding.is_long_term,
        "classified holding period"
    );
    Ok(holding)
}

fn whole_months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months =
        (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}
