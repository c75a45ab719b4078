use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::indexation::{CiiEntry, CostInflationIndex};
use crate::error::CapGainsError;
use crate::types::{Money, Rate};
use crate::CapGainsResult;

/// Cap, purchase window and lock-in for one reinvestment section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinvestmentRule {
    /// Statutory ceiling on the exemption
    pub cap: Money,
    /// Months after the sale within which the reinvestment must be made
    pub deadline_months: u32,
    /// Years the new asset must be held
    pub lock_in_years: u32,
}

/// Statutory constants driving the engine.
///
/// Defaults reflect immovable-property rules for disposals after the July
/// 2024 amendment. Every field may be overridden from a policy file; missing
/// fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxPolicy {
    /// Holding period (months) at which a gain becomes long-term
    pub long_term_threshold_months: u32,
    /// Long-term rate when indexation is claimed (old regime)
    pub indexed_rate: Rate,
    /// Long-term rate without indexation (new regime)
    pub non_indexed_rate: Rate,
    /// Flat rate applied to short-term gains
    pub short_term_rate: Rate,
    /// Health and education cess applied on top of computed tax
    pub cess_rate: Rate,
    /// Property acquired on or after this date must use the new regime
    pub regime_cutoff_date: NaiveDate,
    /// Residential reinvestment
    pub section_54: ReinvestmentRule,
    /// Specified bonds
    pub section_54ec: ReinvestmentRule,
    /// Residential reinvestment of non-residential sale proceeds
    pub section_54f: ReinvestmentRule,
    /// Simple annual coupon on 54EC bonds
    pub bond_interest_rate: Rate,
    /// Fixed-deposit rate used for the pay-tax-and-invest baseline
    pub baseline_fd_rate: Rate,
    /// Replacement CII table; the built-in table is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cii_table: Option<Vec<CiiEntry>>,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            long_term_threshold_months: 24,
            indexed_rate: dec!(0.20),
            non_indexed_rate: dec!(0.125),
            short_term_rate: dec!(0.30),
            cess_rate: dec!(0.04),
            regime_cutoff_date: NaiveDate::from_ymd_opt(2024, 7, 23).unwrap_or_default(),
            section_54: ReinvestmentRule {
                cap: dec!(100_000_000),
                deadline_months: 24,
                lock_in_years: 3,
            },
            section_54ec: ReinvestmentRule {
                cap: dec!(5_000_000),
                deadline_months: 6,
                lock_in_years: 5,
            },
            section_54f: ReinvestmentRule {
                cap: dec!(100_000_000),
                deadline_months: 24,
                lock_in_years: 3,
            },
            bond_interest_rate: dec!(0.0525),
            baseline_fd_rate: dec!(0.08),
            cii_table: None,
        }
    }
}

impl TaxPolicy {
    /// Multiplier applied to a base rate once cess is added.
    pub fn cess_multiplier(&self) -> Decimal {
        Decimal::ONE + self.cess_rate
    }

    /// Reject policies that would make the formulas meaningless.
    pub fn validate(&self) -> CapGainsResult<()> {
        if self.long_term_threshold_months == 0 {
            return Err(invalid(
                "long_term_threshold_months",
                "Threshold must be at least one month",
            ));
        }

        let rates = [
            ("indexed_rate", self.indexed_rate),
            ("non_indexed_rate", self.non_indexed_rate),
            ("short_term_rate", self.short_term_rate),
            ("cess_rate", self.cess_rate),
            ("bond_interest_rate", self.bond_interest_rate),
            ("baseline_fd_rate", self.baseline_fd_rate),
        ];
        for (field, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(invalid(field, "Rate must be between 0 and 1"));
            }
        }

        let rules = [
            ("section_54", &self.section_54),
            ("section_54ec", &self.section_54ec),
            ("section_54f", &self.section_54f),
        ];
        for (field, rule) in rules {
            if rule.cap < Decimal::ZERO {
                return Err(invalid(field, "Exemption cap cannot be negative"));
            }
            if rule.lock_in_years == 0 {
                return Err(invalid(field, "Lock-in must be at least one year"));
            }
        }

        if let Some(entries) = &self.cii_table {
            CostInflationIndex::from_entries(entries.clone())?;
        }

        Ok(())
    }

    /// The CII table in force under this policy.
    pub fn indexation_table(&self) -> CapGainsResult<CostInflationIndex> {
        match &self.cii_table {
            Some(entries) => CostInflationIndex::from_entries(entries.clone()),
            None => Ok(CostInflationIndex::builtin()),
        }
    }
}

fn invalid(field: &str, reason: &str) -> CapGainsError {
    CapGainsError::InvalidPolicy {
        field: field.into(),
        reason: reason.into(),
    }
}
