//! Capital-gains tax engine for the disposal of immovable property.
//!
//! The pipeline runs leaf-first: holding period and CII lookups feed the
//! regime calculator, the selector picks the active regime, and the planner
//! turns the active gain into ranked exemption strategies with forward
//! projections. Every step is a pure function of its inputs.

pub mod engine;
pub mod exemptions;
pub mod holding_period;
pub mod indexation;
pub mod policy;
pub mod projection;
pub mod regime;
pub mod selector;
pub mod transaction;

pub use engine::{
    calculate_bond_projection, classify_holding, compute_capital_gains, lookup_cii,
    BondProjectionInput, CapitalGainsInput, CapitalGainsOutput,
};
pub use exemptions::{ExemptionSection, ExemptionStrategy, StrategyVehicle};
pub use holding_period::HoldingPeriod;
pub use indexation::{CiiEntry, CiiLookup, CiiSource, CostInflationIndex};
pub use policy::{ReinvestmentRule, TaxPolicy};
pub use projection::{BaselineComparison, BondProjection, ReturnProjection};
pub use regime::{RegimeResult, TaxRegime};
pub use selector::{RegimeDecision, RegimeState};
pub use transaction::{AssetType, ProjectionAssumptions, Transaction, MAX_AMOUNT};
