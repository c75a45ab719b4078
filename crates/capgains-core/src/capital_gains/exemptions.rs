use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::holding_period::HoldingPeriod;
use super::policy::{ReinvestmentRule, TaxPolicy};
use super::projection::{project_bond, project_property, BondProjection, ReturnProjection};
use super::regime::RegimeResult;
use super::transaction::{ProjectionAssumptions, Transaction};
use crate::error::CapGainsError;
use crate::types::{round_money, Money};
use crate::CapGainsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExemptionSection {
    /// Residential property reinvested in residential property
    #[serde(rename = "54")]
    Section54,
    /// Gain parked in specified bonds
    #[serde(rename = "54EC")]
    Section54EC,
    /// Non-residential asset reinvested in residential property
    #[serde(rename = "54F")]
    Section54F,
}

impl fmt::Display for ExemptionSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExemptionSection::Section54 => write!(f, "Section 54"),
            ExemptionSection::Section54EC => write!(f, "Section 54EC"),
            ExemptionSection::Section54F => write!(f, "Section 54F"),
        }
    }
}

/// Where the exempted money goes, with its forward projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyVehicle {
    Property(ReturnProjection),
    Bond(BondProjection),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExemptionStrategy {
    pub section: ExemptionSection,
    pub max_exemption: Money,
    pub investment_required: Money,
    pub tax_saved: Money,
    /// Last date to complete the reinvestment
    pub deadline: NaiveDate,
    pub lock_in_years: u32,
    pub notes: Vec<String>,
    pub vehicle: StrategyVehicle,
}

impl ExemptionStrategy {
    /// Cash at the end of the lock-in, net of tax on the returns.
    pub fn net_cash_in_hand(&self) -> Money {
        match &self.vehicle {
            StrategyVehicle::Property(p) => p.net_cash_in_hand,
            StrategyVehicle::Bond(b) => b.net_maturity_value,
        }
    }

    pub fn beats_baseline(&self) -> bool {
        match &self.vehicle {
            StrategyVehicle::Property(p) => p.baseline.is_better,
            StrategyVehicle::Bond(b) => b.baseline.is_better,
        }
    }
}

/// Everything the planner reads; borrowed from the pipeline.
pub struct PlanningContext<'a> {
    pub transaction: &'a Transaction,
    pub holding: &'a HoldingPeriod,
    pub active: &'a RegimeResult,
    pub assumptions: &'a ProjectionAssumptions,
    pub policy: &'a TaxPolicy,
}

/// Enumerate the exemption strategies open to the active gain, ranked by tax
/// saved and then by net cash in hand.
///
/// Short-term disposals and non-positive gains yield an empty list.
pub fn plan_exemptions(ctx: &PlanningContext<'_>) -> CapGainsResult<Vec<ExemptionStrategy>> {
    let gain = ctx.active.capital_gain;
    if !ctx.holding.is_long_term || gain <= Decimal::ZERO {
        return Ok(Vec::new());
    }

    let mut strategies = Vec::with_capacity(2);
    if ctx.transaction.asset_type.is_residential() {
        strategies.push(section_54(ctx, gain)?);
    } else {
        strategies.push(section_54f(ctx, gain)?);
    }
    strategies.push(section_54ec(ctx, gain)?);

    strategies.sort_by(|a, b| {
        b.tax_saved
            .cmp(&a.tax_saved)
            .then_with(|| b.net_cash_in_hand().cmp(&a.net_cash_in_hand()))
    });

    tracing::debug!(count = strategies.len(), "planned exemption strategies");
    Ok(strategies)
}

fn tax_saved(ctx: &PlanningContext<'_>, exemption: Money) -> Money {
    round_money(exemption * ctx.active.tax_rate * ctx.policy.cess_multiplier())
}

fn deadline(sale_date: NaiveDate, rule: &ReinvestmentRule) -> CapGainsResult<NaiveDate> {
    sale_date
        .checked_add_months(Months::new(rule.deadline_months))
        .ok_or_else(|| {
            CapGainsError::DateError(format!(
                "{} months after {} is out of range",
                rule.deadline_months, sale_date
            ))
        })
}

fn section_54(ctx: &PlanningContext<'_>, gain: Money) -> CapGainsResult<ExemptionStrategy> {
    let rule = &ctx.policy.section_54;
    let max_exemption = gain.min(rule.cap);
    let investment_required = max_exemption;

    let mut notes = vec![
        "Buy or construct one residential house in India".to_string(),
        format!(
            "Purchase within {} months of sale (or one year before it)",
            rule.deadline_months
        ),
        format!(
            "Selling the new house within {} years revokes the exemption",
            rule.lock_in_years
        ),
    ];
    if gain > rule.cap {
        notes.push(format!("Exemption capped at {}", rule.cap));
    }

    let projection = project_property(
        investment_required,
        rule.lock_in_years,
        ctx.active.total_tax,
        ctx.assumptions,
        ctx.policy,
    )?;

    Ok(ExemptionStrategy {
        section: ExemptionSection::Section54,
        max_exemption,
        investment_required,
        tax_saved: tax_saved(ctx, max_exemption),
        deadline: deadline(ctx.transaction.sale_date, rule)?,
        lock_in_years: rule.lock_in_years,
        notes,
        vehicle: StrategyVehicle::Property(projection),
    })
}

fn section_54ec(ctx: &PlanningContext<'_>, gain: Money) -> CapGainsResult<ExemptionStrategy> {
    let rule = &ctx.policy.section_54ec;
    let max_exemption = gain.min(rule.cap);
    let investment_required = max_exemption;

    let mut notes = vec![
        "Invest in NHAI, REC, PFC or IRFC capital-gain bonds".to_string(),
        format!("Invest within {} months of sale", rule.deadline_months),
        format!(
            "Bonds are non-transferable and redeem after {} years",
            rule.lock_in_years
        ),
    ];
    if gain > rule.cap {
        notes.push(format!(
            "Investment capped at {}; {} of the gain remains taxable",
            rule.cap,
            gain - rule.cap
        ));
    }

    let projection = project_bond(
        investment_required,
        ctx.policy.bond_interest_rate,
        rule.lock_in_years,
        ctx.assumptions.tax_slab,
        ctx.active.total_tax,
        ctx.policy,
    )?;

    Ok(ExemptionStrategy {
        section: ExemptionSection::Section54EC,
        max_exemption,
        investment_required,
        tax_saved: tax_saved(ctx, max_exemption),
        deadline: deadline(ctx.transaction.sale_date, rule)?,
        lock_in_years: rule.lock_in_years,
        notes,
        vehicle: StrategyVehicle::Bond(projection),
    })
}

/// Exemption is proportional to the share of net sale consideration
/// reinvested; the gain alone buys `gain / NSC` of it.
fn section_54f(ctx: &PlanningContext<'_>, gain: Money) -> CapGainsResult<ExemptionStrategy> {
    let rule = &ctx.policy.section_54f;
    let nsc = ctx.transaction.net_sale_consideration();

    let ratio = if nsc > Decimal::ZERO {
        (gain / nsc).min(Decimal::ONE)
    } else {
        Decimal::ONE
    };
    let max_exemption = round_money(gain * ratio).min(rule.cap);
    let investment_required = gain;

    let mut notes = vec![
        "Buy or construct one residential house in India".to_string(),
        format!(
            "Reinvesting the full net sale consideration of {} exempts the entire gain",
            nsc
        ),
        "Must not own more than one other residential house on the date of transfer"
            .to_string(),
        format!(
            "Selling the new house within {} years revokes the exemption",
            rule.lock_in_years
        ),
    ];
    if ratio < Decimal::ONE {
        notes.push(format!(
            "Investing only the gain exempts {:.2}% of it",
            ratio * Decimal::ONE_HUNDRED
        ));
    }

    let projection = project_property(
        investment_required,
        rule.lock_in_years,
        ctx.active.total_tax,
        ctx.assumptions,
        ctx.policy,
    )?;

    Ok(ExemptionStrategy {
        section: ExemptionSection::Section54F,
        max_exemption,
        investment_required,
        tax_saved: tax_saved(ctx, max_exemption),
        deadline: deadline(ctx.transaction.sale_date, rule)?,
        lock_in_years: rule.lock_in_years,
        notes,
        vehicle: StrategyVehicle::Property(projection),
    })
}
