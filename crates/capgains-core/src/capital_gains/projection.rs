use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::policy::TaxPolicy;
use super::transaction::ProjectionAssumptions;
use crate::time_value::{cagr, compound_value, simple_interest};
use crate::types::{round_money, Money, Rate};
use crate::CapGainsResult;

/// Outcome of paying the tax and parking the remainder in a fixed deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub principal: Money,
    pub fd_rate: Rate,
    pub maturity_value: Money,
    pub interest: Money,
    pub tax_on_interest: Money,
    pub net_amount: Money,
    /// Net cash of the strategy being compared
    pub strategy_net: Money,
    /// `strategy_net - net_amount`
    pub advantage: Money,
    pub is_better: bool,
}

/// Forward value of a property reinvestment over its lock-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnProjection {
    pub investment_amount: Money,
    pub years: u32,
    pub projected_asset_value: Money,
    pub capital_appreciation: Money,
    pub rental_months: u32,
    pub rental_income: Money,
    pub total_returns: Money,
    /// CAGR of investment plus total returns
    pub annualized_return: Rate,
    pub tax_on_rental: Money,
    pub tax_on_appreciation: Money,
    pub tax_on_returns: Money,
    pub net_cash_in_hand: Money,
    pub baseline: BaselineComparison,
}

/// Maturity of a simple-interest bond held to the end of its lock-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondProjection {
    pub principal: Money,
    pub interest_rate: Rate,
    pub years: u32,
    pub annual_interest: Money,
    pub total_interest: Money,
    pub tax_on_interest: Money,
    pub net_maturity_value: Money,
    pub baseline: BaselineComparison,
}

/// Project a property reinvestment.
///
/// Appreciation on the new asset is taxed as a non-indexed long-term gain;
/// rent is taxed at the declared slab. Both carry cess.
pub fn project_property(
    investment: Money,
    years: u32,
    tax_paid_without_exemption: Money,
    assumptions: &ProjectionAssumptions,
    policy: &TaxPolicy,
) -> CapGainsResult<ReturnProjection> {
    let cess = policy.cess_multiplier();

    let projected_asset_value =
        round_money(compound_value(investment, assumptions.appreciation_rate, years)?);
    let capital_appreciation = projected_asset_value - investment;

    let rental_months = years.saturating_mul(12).saturating_sub(assumptions.rent_start_month);
    let rental_income = if assumptions.enable_rental {
        round_money(assumptions.monthly_rent * Decimal::from(rental_months))
    } else {
        Decimal::ZERO
    };

    let total_returns = capital_appreciation + rental_income;
    let annualized_return = cagr(
        investment,
        investment + total_returns,
        Decimal::from(years),
    );

    let tax_on_rental = round_money(rental_income * assumptions.tax_slab * cess);
    let tax_on_appreciation = round_money(
        capital_appreciation.max(Decimal::ZERO) * policy.non_indexed_rate * cess,
    );
    let tax_on_returns = tax_on_rental + tax_on_appreciation;
    let net_cash_in_hand = investment + total_returns - tax_on_returns;

    let baseline = baseline_comparison(
        investment,
        tax_paid_without_exemption,
        years,
        assumptions.tax_slab,
        policy.baseline_fd_rate,
        net_cash_in_hand,
    )?;

    Ok(ReturnProjection {
        investment_amount: investment,
        years,
        projected_asset_value,
        capital_appreciation,
        rental_months,
        rental_income,
        total_returns,
        annualized_return,
        tax_on_rental,
        tax_on_appreciation,
        tax_on_returns,
        net_cash_in_hand,
        baseline,
    })
}

/// Project a simple-interest bond. Coupons are taxed at the slab plus cess.
pub fn project_bond(
    principal: Money,
    interest_rate: Rate,
    years: u32,
    tax_slab: Rate,
    tax_paid_without_exemption: Money,
    policy: &TaxPolicy,
) -> CapGainsResult<BondProjection> {
    let annual_interest = round_money(principal * interest_rate);
    let total_interest = round_money(simple_interest(principal, interest_rate, years));
    let tax_on_interest = round_money(total_interest * tax_slab * policy.cess_multiplier());
    let net_maturity_value = principal + total_interest - tax_on_interest;

    let baseline = baseline_comparison(
        principal,
        tax_paid_without_exemption,
        years,
        tax_slab,
        policy.baseline_fd_rate,
        net_maturity_value,
    )?;

    Ok(BondProjection {
        principal,
        interest_rate,
        years,
        annual_interest,
        total_interest,
        tax_on_interest,
        net_maturity_value,
        baseline,
    })
}

/// Pay the tax in full, invest what is left in an annually compounding FD
/// for the same term, and tax the interest at the slab.
pub fn baseline_comparison(
    investment: Money,
    tax_paid: Money,
    years: u32,
    tax_slab: Rate,
    fd_rate: Rate,
    strategy_net: Money,
) -> CapGainsResult<BaselineComparison> {
    let principal = (investment - tax_paid).max(Decimal::ZERO);
    let maturity_value = round_money(compound_value(principal, fd_rate, years)?);
    let interest = maturity_value - principal;
    let tax_on_interest = round_money(interest * tax_slab);
    let net_amount = maturity_value - tax_on_interest;

    Ok(BaselineComparison {
        principal,
        fd_rate,
        maturity_value,
        interest,
        tax_on_interest,
        net_amount,
        strategy_net,
        advantage: strategy_net - net_amount,
        is_better: strategy_net > net_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bond_known_answer() {
        let policy = TaxPolicy::default();
        let bond =
            project_bond(dec!(1_000_000), dec!(0.0525), 5, dec!(0.30), Decimal::ZERO, &policy)
                .unwrap();
        assert_eq!(bond.annual_interest, dec!(52_500));
        assert_eq!(bond.total_interest, dec!(262_500));
        assert_eq!(bond.tax_on_interest, dec!(81_900));
        assert_eq!(bond.net_maturity_value, dec!(1_180_600));
    }

    #[test]
    fn test_property_without_rent() {
        let policy = TaxPolicy::default();
        let assumptions = ProjectionAssumptions::default();
        let p = project_property(dec!(1_000_000), 3, Decimal::ZERO, &assumptions, &policy)
            .unwrap();
        // 10,00,000 x 1.08^3 = 12,59,712
        assert_eq!(p.projected_asset_value, dec!(1_259_712));
        assert_eq!(p.capital_appreciation, dec!(259_712));
        assert_eq!(p.rental_income, Decimal::ZERO);
        assert_eq!(p.rental_months, 36);
        // 2,59,712 x 12.5% x 1.04 = 33,762.56
        assert_eq!(p.tax_on_appreciation, dec!(33_763));
        assert_eq!(p.net_cash_in_hand, dec!(1_225_949));
        assert!((p.annualized_return - dec!(0.08)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_rental_starts_after_delay() {
        let policy = TaxPolicy::default();
        let assumptions = ProjectionAssumptions {
            enable_rental: true,
            monthly_rent: dec!(20_000),
            rent_start_month: 6,
            ..ProjectionAssumptions::default()
        };
        let p = project_property(dec!(1_000_000), 3, Decimal::ZERO, &assumptions, &policy)
            .unwrap();
        assert_eq!(p.rental_months, 30);
        assert_eq!(p.rental_income, dec!(600_000));
        // 6,00,000 x 30% x 1.04
        assert_eq!(p.tax_on_rental, dec!(187_200));
        assert_eq!(p.tax_on_returns, p.tax_on_rental + p.tax_on_appreciation);
    }

    #[test]
    fn test_rent_start_beyond_lock_in_yields_no_rent() {
        let policy = TaxPolicy::default();
        let assumptions = ProjectionAssumptions {
            enable_rental: true,
            monthly_rent: dec!(20_000),
            rent_start_month: 48,
            ..ProjectionAssumptions::default()
        };
        let p = project_property(dec!(1_000_000), 3, Decimal::ZERO, &assumptions, &policy)
            .unwrap();
        assert_eq!(p.rental_months, 0);
        assert_eq!(p.rental_income, Decimal::ZERO);
    }

    #[test]
    fn test_depreciating_property_not_taxed() {
        let policy = TaxPolicy::default();
        let assumptions = ProjectionAssumptions {
            appreciation_rate: dec!(-0.05),
            ..ProjectionAssumptions::default()
        };
        let p = project_property(dec!(1_000_000), 3, Decimal::ZERO, &assumptions, &policy)
            .unwrap();
        assert!(p.capital_appreciation < Decimal::ZERO);
        assert_eq!(p.tax_on_appreciation, Decimal::ZERO);
        assert!(p.annualized_return < Decimal::ZERO);
    }

    #[test]
    fn test_baseline_known_answer() {
        // Pay 3,38,000 tax on 26,00,000 and invest the rest at 8% for 3 years
        let b = baseline_comparison(
            dec!(2_600_000),
            dec!(338_000),
            3,
            dec!(0.30),
            dec!(0.08),
            dec!(3_000_000),
        )
        .unwrap();
        assert_eq!(b.principal, dec!(2_262_000));
        // 22,62,000 x 1.259712 = 28,49,468.54
        assert_eq!(b.maturity_value, dec!(2_849_469));
        assert_eq!(b.interest, dec!(587_469));
        assert_eq!(b.tax_on_interest, dec!(176_241));
        assert_eq!(b.net_amount, dec!(2_673_228));
        assert!(b.is_better);
        assert_eq!(b.advantage, dec!(326_772));
    }

    #[test]
    fn test_baseline_principal_floors_at_zero() {
        let b = baseline_comparison(dec!(100), dec!(500), 5, dec!(0.3), dec!(0.08), dec!(0))
            .unwrap();
        assert_eq!(b.principal, Decimal::ZERO);
        assert_eq!(b.net_amount, Decimal::ZERO);
        assert!(!b.is_better);
    }
}
