use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use capgains_core::capital_gains::{
    self, AssetType, BondProjectionInput, CapitalGainsInput, ProjectionAssumptions, TaxPolicy,
    TaxRegime, Transaction,
};

use crate::input;

/// Arguments for the full capital-gains computation
#[derive(Args)]
pub struct CapitalGainsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Asset sold: residential, commercial or land
    #[arg(long)]
    pub asset_type: Option<AssetType>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,

    /// Sale date (YYYY-MM-DD)
    #[arg(long)]
    pub sale_date: Option<NaiveDate>,

    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    #[arg(long, default_value = "0")]
    pub stamp_duty: Decimal,

    #[arg(long, default_value = "0")]
    pub improvement_cost: Decimal,

    /// Date of the improvement (defaults to the purchase date)
    #[arg(long)]
    pub improvement_date: Option<NaiveDate>,

    #[arg(long)]
    pub sale_price: Option<Decimal>,

    #[arg(long, default_value = "0")]
    pub brokerage: Decimal,

    #[arg(long, default_value = "0")]
    pub legal_fees: Decimal,

    /// Expected annual appreciation of a reinvested property (e.g. 0.08)
    #[arg(long)]
    pub appreciation_rate: Option<Decimal>,

    /// Include rental income in property projections
    #[arg(long)]
    pub enable_rental: bool,

    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Months after purchase before rent starts
    #[arg(long)]
    pub rent_start_month: Option<u32>,

    /// Marginal income-tax slab (e.g. 0.30)
    #[arg(long)]
    pub tax_slab: Option<Decimal>,

    /// Preferred regime when a choice exists: indexed/old or non_indexed/new
    #[arg(long)]
    pub regime: Option<TaxRegime>,
}

pub fn run_capital_gains(
    args: CapitalGainsArgs,
    policy: Option<&TaxPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut cg_input: CapitalGainsInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_piped()? {
        piped
    } else {
        let transaction = Transaction {
            asset_type: args
                .asset_type
                .ok_or("--asset-type is required (or provide --input)")?,
            purchase_date: args
                .purchase_date
                .ok_or("--purchase-date is required (or provide --input)")?,
            sale_date: args
                .sale_date
                .ok_or("--sale-date is required (or provide --input)")?,
            purchase_price: args
                .purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            stamp_duty: args.stamp_duty,
            improvement_cost: args.improvement_cost,
            improvement_date: args.improvement_date,
            sale_price: args
                .sale_price
                .ok_or("--sale-price is required (or provide --input)")?,
            brokerage: args.brokerage,
            legal_fees: args.legal_fees,
        };

        let defaults = ProjectionAssumptions::default();
        let assumptions = ProjectionAssumptions {
            appreciation_rate: args.appreciation_rate.unwrap_or(defaults.appreciation_rate),
            enable_rental: args.enable_rental,
            monthly_rent: args.monthly_rent.unwrap_or(defaults.monthly_rent),
            rent_start_month: args.rent_start_month.unwrap_or(defaults.rent_start_month),
            tax_slab: args.tax_slab.unwrap_or(defaults.tax_slab),
            user_selected_regime: args.regime,
        };

        CapitalGainsInput {
            transaction,
            assumptions,
            policy: None,
        }
    };

    // A policy file on the command line wins over one embedded in the input
    if let Some(policy) = policy {
        cg_input.policy = Some(policy.clone());
    }

    let result = capital_gains::compute_capital_gains(&cg_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a CII lookup
#[derive(Args)]
pub struct CiiArgs {
    /// Any date within the fiscal year (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
}

pub fn run_cii(args: CiiArgs, policy: Option<&TaxPolicy>) -> Result<Value, Box<dyn std::error::Error>> {
    let result = capital_gains::lookup_cii(args.date, policy)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for holding-period classification
#[derive(Args)]
pub struct HoldingPeriodArgs {
    #[arg(long)]
    pub purchase_date: NaiveDate,

    #[arg(long)]
    pub sale_date: NaiveDate,
}

pub fn run_holding_period(
    args: HoldingPeriodArgs,
    policy: Option<&TaxPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let result = capital_gains::classify_holding(args.purchase_date, args.sale_date, policy)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a 54EC bond projection
#[derive(Args)]
pub struct BondArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested in bonds
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual simple interest rate (defaults to the policy bond rate)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years to maturity (defaults to the 54EC lock-in)
    #[arg(long)]
    pub years: Option<u32>,

    /// Marginal income-tax slab applied to interest
    #[arg(long, default_value = "0.30")]
    pub tax_slab: Decimal,

    /// Tax payable without the exemption, for the FD baseline
    #[arg(long, default_value = "0")]
    pub tax_without_exemption: Decimal,
}

pub fn run_bond_projection(
    args: BondArgs,
    policy: Option<&TaxPolicy>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut bond_input: BondProjectionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_piped()? {
        piped
    } else {
        BondProjectionInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            interest_rate: args.rate,
            years: args.years,
            tax_slab: args.tax_slab,
            tax_without_exemption: args.tax_without_exemption,
            policy: None,
        }
    };

    if let Some(policy) = policy {
        bond_input.policy = Some(policy.clone());
    }

    let result = capital_gains::calculate_bond_projection(&bond_input)?;
    Ok(serde_json::to_value(result)?)
}
