use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::holding_period::HoldingPeriod;
use super::policy::TaxPolicy;
use super::transaction::Transaction;
use crate::types::{round_money, Money, Rate};

/// Statutory computation applied to a gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Old regime: indexed cost, higher rate
    Indexed,
    /// New regime: actual cost, lower rate
    NonIndexed,
    /// Short-term gain at the flat rate
    ShortTerm,
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxRegime::Indexed => write!(f, "indexed"),
            TaxRegime::NonIndexed => write!(f, "non_indexed"),
            TaxRegime::ShortTerm => write!(f, "short_term"),
        }
    }
}

impl std::str::FromStr for TaxRegime {
    type Err = crate::CapGainsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indexed" | "old" => Ok(TaxRegime::Indexed),
            "non_indexed" | "non-indexed" | "new" => Ok(TaxRegime::NonIndexed),
            "short_term" | "short-term" => Ok(TaxRegime::ShortTerm),
            other => Err(crate::CapGainsError::InvalidInput {
                field: "regime".into(),
                reason: format!("Unknown regime '{other}'"),
            }),
        }
    }
}

/// Gain and tax under one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime: TaxRegime,
    /// Cost deducted from the net sale consideration (indexed or actual)
    pub acquisition_cost: Money,
    /// Net sale consideration less cost; negative for a loss
    pub capital_gain: Money,
    /// Base rate before cess
    pub tax_rate: Rate,
    pub total_tax: Money,
    pub net_proceeds: Money,
}

impl RegimeResult {
    /// Strictly negative gain. A zero gain is neither a loss nor taxable.
    pub fn is_loss(&self) -> bool {
        self.capital_gain < Decimal::ZERO
    }
}

/// CII values resolved for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiiSnapshot {
    pub purchase: u32,
    pub sale: u32,
    pub improvement: u32,
}

/// Scale a cost from one CII to another. A zero source index leaves the
/// cost unindexed.
pub fn index_cost(cost: Money, from_cii: u32, to_cii: u32) -> Money {
    if from_cii == 0 {
        return cost;
    }
    cost * Decimal::from(to_cii) / Decimal::from(from_cii)
}

/// Indexed cost of acquisition plus indexed improvement, rounded to whole
/// currency units.
pub fn indexed_acquisition_cost(tx: &Transaction, cii: &CiiSnapshot) -> Money {
    let base = index_cost(tx.base_cost(), cii.purchase, cii.sale);
    let improvement = index_cost(tx.improvement_cost, cii.improvement, cii.sale);
    round_money(base + improvement)
}

/// Compute every regime applicable to the transaction.
///
/// Long-term disposals yield `[Indexed, NonIndexed]` in that order; short-term
/// disposals yield a single `ShortTerm` result.
pub fn compute_regime_results(
    tx: &Transaction,
    holding: &HoldingPeriod,
    cii: &CiiSnapshot,
    policy: &TaxPolicy,
) -> Vec<RegimeResult> {
    let nsc = tx.net_sale_consideration();
    let cess = policy.cess_multiplier();

    if !holding.is_long_term {
        return vec![regime_result(
            TaxRegime::ShortTerm,
            tx.total_acquisition_cost(),
            nsc,
            policy.short_term_rate,
            cess,
        )];
    }

    let indexed = regime_result(
        TaxRegime::Indexed,
        indexed_acquisition_cost(tx, cii),
        nsc,
        policy.indexed_rate,
        cess,
    );
    let non_indexed = regime_result(
        TaxRegime::NonIndexed,
        tx.total_acquisition_cost(),
        nsc,
        policy.non_indexed_rate,
        cess,
    );

    tracing::debug!(
        indexed_gain = %indexed.capital_gain,
        indexed_tax = %indexed.total_tax,
        non_indexed_gain = %non_indexed.capital_gain,
        non_indexed_tax = %non_indexed.total_tax,
        "computed regime results"
    );

    vec![indexed, non_indexed]
}

fn regime_result(
    regime: TaxRegime,
    acquisition_cost: Money,
    net_sale_consideration: Money,
    rate: Rate,
    cess_multiplier: Decimal,
) -> RegimeResult {
    let capital_gain = net_sale_consideration - acquisition_cost;
    let total_tax = round_money(capital_gain.max(Decimal::ZERO) * rate * cess_multiplier);

    RegimeResult {
        regime,
        acquisition_cost,
        capital_gain,
        tax_rate: rate,
        total_tax,
        net_proceeds: net_sale_consideration - total_tax,
    }
}
