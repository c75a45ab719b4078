use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::exemptions::{plan_exemptions, ExemptionStrategy, PlanningContext};
use super::holding_period::{classify_holding_period, HoldingPeriod};
use super::indexation::CiiLookup;
use super::policy::TaxPolicy;
use super::projection::{project_bond, BondProjection};
use super::regime::{compute_regime_results, CiiSnapshot, RegimeResult, TaxRegime};
use super::selector::{active_result, select_regime, transition, RegimeDecision};
use super::transaction::{validate_amount, ProjectionAssumptions, Transaction};
use crate::error::CapGainsError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::CapGainsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalGainsInput {
    pub transaction: Transaction,
    #[serde(default)]
    pub assumptions: ProjectionAssumptions,
    /// Overrides the built-in statutory constants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<TaxPolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalGainsOutput {
    pub holding_period: HoldingPeriod,
    pub purchase_cii: CiiLookup,
    pub sale_cii: CiiLookup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_cii: Option<CiiLookup>,
    pub net_sale_consideration: Money,
    pub total_acquisition_cost: Money,
    /// `[indexed, non_indexed]` for long-term gains, `[short_term]` otherwise
    pub regime_results: Vec<RegimeResult>,
    pub regime_decision: RegimeDecision,
    pub active_result: RegimeResult,
    pub strategies: Vec<ExemptionStrategy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondProjectionInput {
    pub principal: Money,
    /// Defaults to the policy's bond rate
    #[serde(default)]
    pub interest_rate: Option<Rate>,
    /// Defaults to the policy's 54EC lock-in
    #[serde(default)]
    pub years: Option<u32>,
    pub tax_slab: Rate,
    /// Tax that would be paid without the bonds, for the FD baseline
    #[serde(default)]
    pub tax_without_exemption: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<TaxPolicy>,
}

// ---------------------------------------------------------------------------
// Function 1: Full capital-gains pipeline
// ---------------------------------------------------------------------------

/// Run the full capital-gains pipeline for one disposal.
///
/// Classifies the holding period, resolves CII values, computes tax under
/// every applicable regime, selects the active regime and plans exemption
/// strategies with forward projections. Identical inputs always produce an
/// identical `result`.
pub fn compute_capital_gains(
    input: &CapitalGainsInput,
) -> CapGainsResult<ComputationOutput<CapitalGainsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let policy = resolve_policy(input.policy.as_ref())?;
    let tx = &input.transaction;
    tx.validate()?;
    input.assumptions.validate()?;

    // ------------------------------------------------------------------
    // 1. Holding period and indexation
    // ------------------------------------------------------------------
    let holding = classify_holding_period(
        tx.purchase_date,
        tx.sale_date,
        policy.long_term_threshold_months,
    )?;

    let table = policy.indexation_table()?;
    let purchase_cii = table.lookup(tx.purchase_date);
    let sale_cii = table.lookup(tx.sale_date);
    let improvement_cii = if tx.improvement_cost > Decimal::ZERO {
        Some(table.lookup(tx.effective_improvement_date()))
    } else {
        None
    };

    if holding.is_long_term {
        for lookup in [Some(&purchase_cii), Some(&sale_cii), improvement_cii.as_ref()]
            .into_iter()
            .flatten()
            .filter(|l| !l.is_exact())
        {
            warnings.extend(lookup.caveat());
        }
    }

    let snapshot = CiiSnapshot {
        purchase: purchase_cii.value,
        sale: sale_cii.value,
        improvement: improvement_cii
            .as_ref()
            .map_or(purchase_cii.value, |l| l.value),
    };

    // ------------------------------------------------------------------
    // 2. Regime computation and selection
    // ------------------------------------------------------------------
    let regime_results = compute_regime_results(tx, &holding, &snapshot, &policy);
    let state = transition(tx.purchase_date, &holding, policy.regime_cutoff_date);
    let regime_decision = select_regime(
        state,
        &regime_results,
        input.assumptions.user_selected_regime,
        &mut warnings,
    )?;
    let active = active_result(&regime_results, &regime_decision)?.clone();

    if active.regime == TaxRegime::ShortTerm {
        warnings.push(format!(
            "Short-term gain taxed at a flat {}% regardless of income slab",
            (active.tax_rate * Decimal::ONE_HUNDRED).normalize()
        ));
    }
    if active.is_loss() {
        warnings.push(format!(
            "No tax payable: {} regime shows a capital loss of {}",
            active.regime,
            -active.capital_gain
        ));
    }

    // ------------------------------------------------------------------
    // 3. Exemption planning
    // ------------------------------------------------------------------
    let strategies = plan_exemptions(&PlanningContext {
        transaction: tx,
        holding: &holding,
        active: &active,
        assumptions: &input.assumptions,
        policy: &policy,
    })?;

    for strategy in strategies.iter().filter(|s| !s.beats_baseline()) {
        warnings.push(format!(
            "Section {} leaves less cash after {} years than paying the tax and \
             holding a fixed deposit",
            strategy.section, strategy.lock_in_years
        ));
    }

    tracing::debug!(
        regime = %active.regime,
        gain = %active.capital_gain,
        tax = %active.total_tax,
        strategies = strategies.len(),
        "capital gains computed"
    );

    let output = CapitalGainsOutput {
        holding_period: holding,
        purchase_cii,
        sale_cii,
        improvement_cii,
        net_sale_consideration: tx.net_sale_consideration(),
        total_acquisition_cost: tx.total_acquisition_cost(),
        regime_results,
        regime_decision,
        active_result: active,
        strategies,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Capital gains on immovable property: holding-period classification, \
         CII indexation, dual-regime comparison, Section 54/54EC/54F planning",
        &serde_json::json!({
            "asset_type": tx.asset_type.to_string(),
            "purchase_date": tx.purchase_date.to_string(),
            "sale_date": tx.sale_date.to_string(),
            "appreciation_rate": input.assumptions.appreciation_rate.to_string(),
            "enable_rental": input.assumptions.enable_rental,
            "monthly_rent": input.assumptions.monthly_rent.to_string(),
            "rent_start_month": input.assumptions.rent_start_month,
            "tax_slab": input.assumptions.tax_slab.to_string(),
            "user_selected_regime": input.assumptions.user_selected_regime.map(|r| r.to_string()),
            "cess_rate": policy.cess_rate.to_string(),
            "regime_cutoff_date": policy.regime_cutoff_date.to_string(),
            "baseline_fd_rate": policy.baseline_fd_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Function 2: CII lookup
// ---------------------------------------------------------------------------

pub fn lookup_cii(
    date: NaiveDate,
    policy: Option<&TaxPolicy>,
) -> CapGainsResult<ComputationOutput<CiiLookup>> {
    let start = Instant::now();
    let policy = resolve_policy(policy)?;
    let lookup = policy.indexation_table()?.lookup(date);
    let warnings = lookup.caveat().into_iter().collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cost inflation index lookup by fiscal year (April-March), forward-filled",
        &serde_json::json!({ "date": date.to_string() }),
        warnings,
        elapsed,
        lookup,
    ))
}

// ---------------------------------------------------------------------------
// Function 3: Holding period classification
// ---------------------------------------------------------------------------

pub fn classify_holding(
    purchase_date: NaiveDate,
    sale_date: NaiveDate,
    policy: Option<&TaxPolicy>,
) -> CapGainsResult<ComputationOutput<HoldingPeriod>> {
    let start = Instant::now();
    let policy = resolve_policy(policy)?;
    let holding =
        classify_holding_period(purchase_date, sale_date, policy.long_term_threshold_months)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Whole calendar months held; long-term at the policy threshold",
        &serde_json::json!({
            "purchase_date": purchase_date.to_string(),
            "sale_date": sale_date.to_string(),
            "long_term_threshold_months": policy.long_term_threshold_months,
        }),
        Vec::new(),
        elapsed,
        holding,
    ))
}

// ---------------------------------------------------------------------------
// Function 4: Standalone bond projection
// ---------------------------------------------------------------------------

pub fn calculate_bond_projection(
    input: &BondProjectionInput,
) -> CapGainsResult<ComputationOutput<BondProjection>> {
    let start = Instant::now();
    let policy = resolve_policy(input.policy.as_ref())?;

    if input.principal <= Decimal::ZERO {
        return Err(CapGainsError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.tax_slab < Decimal::ZERO || input.tax_slab > Decimal::ONE {
        return Err(CapGainsError::InvalidInput {
            field: "tax_slab".into(),
            reason: "Tax slab must be between 0 and 1".into(),
        });
    }
    validate_amount("principal", input.principal)?;
    validate_amount("tax_without_exemption", input.tax_without_exemption)?;

    let rate = input.interest_rate.unwrap_or(policy.bond_interest_rate);
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(CapGainsError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must be between 0 and 1".into(),
        });
    }
    let years = input.years.unwrap_or(policy.section_54ec.lock_in_years);

    let mut warnings = Vec::new();
    if input.principal > policy.section_54ec.cap {
        warnings.push(format!(
            "Principal exceeds the 54EC investment cap of {}",
            policy.section_54ec.cap
        ));
    }

    let projection = project_bond(
        input.principal,
        rate,
        years,
        input.tax_slab,
        input.tax_without_exemption,
        &policy,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Simple-interest bond held to maturity, coupons taxed at slab plus cess",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "interest_rate": rate.to_string(),
            "years": years,
            "tax_slab": input.tax_slab.to_string(),
        }),
        warnings,
        elapsed,
        projection,
    ))
}

fn resolve_policy(policy: Option<&TaxPolicy>) -> CapGainsResult<TaxPolicy> {
    let policy = policy.cloned().unwrap_or_default();
    policy.validate()?;
    Ok(policy)
}
