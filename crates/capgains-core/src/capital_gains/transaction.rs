use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::regime::TaxRegime;
use crate::error::CapGainsError;
use crate::types::{Money, Rate};
use crate::CapGainsResult;

/// Largest accepted monetary input (10^15). Keeps indexed costs and
/// compounded projections well inside `Decimal` range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Reject amounts that are negative or above [`MAX_AMOUNT`].
pub(crate) fn validate_amount(field: &str, amount: Money) -> CapGainsResult<()> {
    if amount < Decimal::ZERO {
        return Err(CapGainsError::InvalidInput {
            field: field.into(),
            reason: "Amount cannot be negative".into(),
        });
    }
    if amount > MAX_AMOUNT {
        return Err(CapGainsError::InvalidInput {
            field: field.into(),
            reason: format!("Amount exceeds the supported maximum of {}", MAX_AMOUNT),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Residential,
    Commercial,
    Land,
}

impl AssetType {
    pub fn is_residential(self) -> bool {
        matches!(self, AssetType::Residential)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Residential => write!(f, "residential"),
            AssetType::Commercial => write!(f, "commercial"),
            AssetType::Land => write!(f, "land"),
        }
    }
}

impl FromStr for AssetType {
    type Err = CapGainsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residential" => Ok(AssetType::Residential),
            "commercial" => Ok(AssetType::Commercial),
            "land" | "plot" => Ok(AssetType::Land),
            other => Err(CapGainsError::InvalidInput {
                field: "asset_type".into(),
                reason: format!("Unknown asset type '{other}'"),
            }),
        }
    }
}

/// One disposal of immovable property. A fresh snapshot per calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub asset_type: AssetType,
    pub purchase_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub purchase_price: Money,
    #[serde(default)]
    pub stamp_duty: Money,
    #[serde(default)]
    pub improvement_cost: Money,
    /// When the improvement was made; the purchase date is assumed if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_date: Option<NaiveDate>,
    pub sale_price: Money,
    #[serde(default)]
    pub brokerage: Money,
    #[serde(default)]
    pub legal_fees: Money,
}

impl Transaction {
    /// Sale price less transfer expenses.
    pub fn net_sale_consideration(&self) -> Money {
        self.sale_price - (self.brokerage + self.legal_fees)
    }

    /// Purchase price plus stamp duty, the part indexed from the purchase date.
    pub fn base_cost(&self) -> Money {
        self.purchase_price + self.stamp_duty
    }

    pub fn total_acquisition_cost(&self) -> Money {
        self.base_cost() + self.improvement_cost
    }

    pub fn effective_improvement_date(&self) -> NaiveDate {
        self.improvement_date.unwrap_or(self.purchase_date)
    }

    pub fn validate(&self) -> CapGainsResult<()> {
        let amounts = [
            ("purchase_price", self.purchase_price),
            ("stamp_duty", self.stamp_duty),
            ("improvement_cost", self.improvement_cost),
            ("sale_price", self.sale_price),
            ("brokerage", self.brokerage),
            ("legal_fees", self.legal_fees),
        ];
        for (field, amount) in amounts {
            validate_amount(field, amount)?;
        }

        if self.sale_date <= self.purchase_date {
            return Err(CapGainsError::InvalidInput {
                field: "sale_date".into(),
                reason: format!(
                    "Sale date {} must be after purchase date {}",
                    self.sale_date, self.purchase_date
                ),
            });
        }

        if let Some(date) = self.improvement_date {
            if date < self.purchase_date || date > self.sale_date {
                return Err(CapGainsError::InvalidInput {
                    field: "improvement_date".into(),
                    reason: "Improvement must fall between purchase and sale".into(),
                });
            }
        }

        Ok(())
    }
}

/// User-declared assumptions for forward projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionAssumptions {
    /// Expected annual appreciation of the new property
    pub appreciation_rate: Rate,
    pub enable_rental: bool,
    pub monthly_rent: Money,
    /// Months after purchase before the first rent is received
    pub rent_start_month: u32,
    /// Marginal income-tax slab for rent and interest
    pub tax_slab: Rate,
    /// Regime the user wants to apply when a choice is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selected_regime: Option<TaxRegime>,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            appreciation_rate: dec!(0.08),
            enable_rental: false,
            monthly_rent: Decimal::ZERO,
            rent_start_month: 0,
            tax_slab: dec!(0.30),
            user_selected_regime: None,
        }
    }
}

impl ProjectionAssumptions {
    pub fn validate(&self) -> CapGainsResult<()> {
        if self.appreciation_rate <= dec!(-1) {
            return Err(CapGainsError::InvalidInput {
                field: "appreciation_rate".into(),
                reason: "Appreciation rate must be greater than -100%".into(),
            });
        }
        validate_amount("monthly_rent", self.monthly_rent)?;
        if self.tax_slab < Decimal::ZERO || self.tax_slab > Decimal::ONE {
            return Err(CapGainsError::InvalidInput {
                field: "tax_slab".into(),
                reason: "Tax slab must be between 0 and 1".into(),
            });
        }
        Ok(())
    }
}
