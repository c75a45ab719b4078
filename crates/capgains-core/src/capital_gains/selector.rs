use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::holding_period::HoldingPeriod;
use super::regime::{RegimeResult, TaxRegime};
use crate::error::CapGainsError;
use crate::CapGainsResult;

/// Regime-selection states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeState {
    /// Acquired on or after the cutoff: new regime only
    MandatoryNew,
    /// Indexed regime only. No current rule transitions here.
    MandatoryOld,
    /// Long-term gain on pre-cutoff property: taxpayer may choose
    Choice,
    /// Short-term gain: flat rate, no regime applies
    ShortTerm,
}

impl RegimeState {
    pub fn mandatory_regime(self) -> Option<TaxRegime> {
        match self {
            RegimeState::MandatoryNew => Some(TaxRegime::NonIndexed),
            RegimeState::MandatoryOld => Some(TaxRegime::Indexed),
            RegimeState::Choice | RegimeState::ShortTerm => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeDecision {
    pub state: RegimeState,
    pub mandatory_regime: Option<TaxRegime>,
    pub can_choose: bool,
    pub recommended: TaxRegime,
    pub user_selected: Option<TaxRegime>,
    /// Regime whose result feeds exemption planning
    pub active: TaxRegime,
}

/// The single transition of the selector.
pub fn transition(
    purchase_date: NaiveDate,
    holding: &HoldingPeriod,
    regime_cutoff_date: NaiveDate,
) -> RegimeState {
    if purchase_date >= regime_cutoff_date {
        RegimeState::MandatoryNew
    } else if holding.is_long_term {
        RegimeState::Choice
    } else {
        RegimeState::ShortTerm
    }
}

/// Decide which computed result is active.
///
/// A user selection only takes effect in the `Choice` state; otherwise it is
/// recorded, ignored, and reported through `warnings`.
pub fn select_regime(
    state: RegimeState,
    results: &[RegimeResult],
    user_selected: Option<TaxRegime>,
    warnings: &mut Vec<String>,
) -> CapGainsResult<RegimeDecision> {
    let cheapest = results
        .iter()
        .min_by(|a, b| a.total_tax.cmp(&b.total_tax))
        .ok_or_else(|| CapGainsError::InvalidInput {
            field: "regime_results".into(),
            reason: "No regime results to select from".into(),
        })?;

    let recommended = match state.mandatory_regime() {
        Some(regime) if has_result(results, regime) => regime,
        // A mandated regime has no result when the gain is short-term
        _ => cheapest.regime,
    };

    let can_choose = state == RegimeState::Choice;
    let active = match user_selected {
        Some(choice) if can_choose && has_result(results, choice) => choice,
        Some(choice) => {
            warnings.push(format!(
                "Requested {choice} regime ignored; {recommended} applies ({state:?})"
            ));
            recommended
        }
        None => recommended,
    };

    tracing::debug!(?state, %recommended, %active, "selected tax regime");

    Ok(RegimeDecision {
        state,
        mandatory_regime: state.mandatory_regime(),
        can_choose,
        recommended,
        user_selected,
        active,
    })
}

fn has_result(results: &[RegimeResult], regime: TaxRegime) -> bool {
    results.iter().any(|r| r.regime == regime)
}

/// The result for the active regime.
pub fn active_result<'a>(
    results: &'a [RegimeResult],
    decision: &RegimeDecision,
) -> CapGainsResult<&'a RegimeResult> {
    results
        .iter()
        .find(|r| r.regime == decision.active)
        .ok_or_else(|| CapGainsError::InvalidInput {
            field: "regime".into(),
            reason: format!("No result computed for {} regime", decision.active),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn holding(long: bool) -> HoldingPeriod {
        HoldingPeriod {
            months: if long { 60 } else { 10 },
            years: if long { 5 } else { 0 },
            remainder_months: if long { 0 } else { 10 },
            days: if long { 1826 } else { 300 },
            is_long_term: long,
        }
    }

    fn result(regime: TaxRegime, tax: Decimal) -> RegimeResult {
        RegimeResult {
            regime,
            acquisition_cost: dec!(100),
            capital_gain: dec!(1000),
            tax_rate: dec!(0.2),
            total_tax: tax,
            net_proceeds: dec!(1000) - tax,
        }
    }

    fn long_results(indexed_tax: Decimal, non_indexed_tax: Decimal) -> Vec<RegimeResult> {
        vec![
            result(TaxRegime::Indexed, indexed_tax),
            result(TaxRegime::NonIndexed, non_indexed_tax),
        ]
    }

    fn cutoff() -> NaiveDate {
        d(2024, 7, 23)
    }

    #[test]
    fn test_transition_cutoff_is_inclusive() {
        assert_eq!(
            transition(cutoff(), &holding(true), cutoff()),
            RegimeState::MandatoryNew
        );
        assert_eq!(
            transition(d(2024, 7, 22), &holding(true), cutoff()),
            RegimeState::Choice
        );
        assert_eq!(
            transition(d(2024, 7, 22), &holding(false), cutoff()),
            RegimeState::ShortTerm
        );
    }

    #[test]
    fn test_post_cutoff_never_allows_choice() {
        for long in [true, false] {
            let state = transition(d(2025, 1, 1), &holding(long), cutoff());
            let results = if long {
                long_results(dec!(0), dec!(500))
            } else {
                vec![result(TaxRegime::ShortTerm, dec!(300))]
            };
            let mut warnings = Vec::new();
            let decision = select_regime(state, &results, None, &mut warnings).unwrap();
            assert!(!decision.can_choose);
            assert_eq!(decision.mandatory_regime, Some(TaxRegime::NonIndexed));
        }
    }

    #[test]
    fn test_mandatory_new_ignores_cheaper_indexed() {
        let results = long_results(dec!(0), dec!(338_000));
        let mut warnings = Vec::new();
        let decision =
            select_regime(RegimeState::MandatoryNew, &results, None, &mut warnings).unwrap();
        assert_eq!(decision.active, TaxRegime::NonIndexed);
        assert_eq!(decision.recommended, TaxRegime::NonIndexed);
    }

    #[test]
    fn test_choice_recommends_lower_tax() {
        let mut warnings = Vec::new();
        let decision = select_regime(
            RegimeState::Choice,
            &long_results(dec!(0), dec!(338_000)),
            None,
            &mut warnings,
        )
        .unwrap();
        assert!(decision.can_choose);
        assert_eq!(decision.recommended, TaxRegime::Indexed);
        assert_eq!(decision.active, TaxRegime::Indexed);

        let decision = select_regime(
            RegimeState::Choice,
            &long_results(dec!(500), dec!(400)),
            None,
            &mut warnings,
        )
        .unwrap();
        assert_eq!(decision.recommended, TaxRegime::NonIndexed);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_choice_tie_prefers_indexed() {
        let mut warnings = Vec::new();
        let decision = select_regime(
            RegimeState::Choice,
            &long_results(dec!(100), dec!(100)),
            None,
            &mut warnings,
        )
        .unwrap();
        assert_eq!(decision.recommended, TaxRegime::Indexed);
    }

    #[test]
    fn test_user_selection_overrides_recommendation() {
        let mut warnings = Vec::new();
        let decision = select_regime(
            RegimeState::Choice,
            &long_results(dec!(0), dec!(338_000)),
            Some(TaxRegime::NonIndexed),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(decision.recommended, TaxRegime::Indexed);
        assert_eq!(decision.active, TaxRegime::NonIndexed);
        assert_eq!(decision.user_selected, Some(TaxRegime::NonIndexed));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_user_selection_ignored_when_mandatory() {
        let mut warnings = Vec::new();
        let decision = select_regime(
            RegimeState::MandatoryNew,
            &long_results(dec!(0), dec!(338_000)),
            Some(TaxRegime::Indexed),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(decision.active, TaxRegime::NonIndexed);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ignored"));
    }

    #[test]
    fn test_short_term_uses_flat_result() {
        let results = vec![result(TaxRegime::ShortTerm, dec!(300))];
        let mut warnings = Vec::new();
        let decision =
            select_regime(RegimeState::ShortTerm, &results, Some(TaxRegime::Indexed), &mut warnings)
                .unwrap();
        assert_eq!(decision.active, TaxRegime::ShortTerm);
        assert!(!decision.can_choose);
        assert_eq!(decision.mandatory_regime, None);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            active_result(&results, &decision).unwrap().total_tax,
            dec!(300)
        );
    }

    #[test]
    fn test_mandatory_new_short_term_falls_back_to_flat() {
        let results = vec![result(TaxRegime::ShortTerm, dec!(300))];
        let mut warnings = Vec::new();
        let decision =
            select_regime(RegimeState::MandatoryNew, &results, None, &mut warnings).unwrap();
        assert_eq!(decision.active, TaxRegime::ShortTerm);
        assert_eq!(decision.mandatory_regime, Some(TaxRegime::NonIndexed));
    }

    #[test]
    fn test_empty_results_is_error() {
        let mut warnings = Vec::new();
        assert!(select_regime(RegimeState::Choice, &[], None, &mut warnings).is_err());
    }
}
