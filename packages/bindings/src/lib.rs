use capgains_core::capital_gains::{self, BondProjectionInput, CapitalGainsInput, TaxPolicy};
use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_date(field: &str, value: &str) -> NapiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| to_napi_error(format!("{}: expected YYYY-MM-DD ({})", field, e)))
}

fn parse_policy(policy_json: Option<String>) -> NapiResult<Option<TaxPolicy>> {
    policy_json
        .map(|json| serde_json::from_str::<TaxPolicy>(&json).map_err(to_napi_error))
        .transpose()
}

// ---------------------------------------------------------------------------
// Capital gains
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_capital_gains(input_json: String) -> NapiResult<String> {
    let input: CapitalGainsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = capital_gains::compute_capital_gains(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_bond(input_json: String) -> NapiResult<String> {
    let input: BondProjectionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = capital_gains::calculate_bond_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[napi]
pub fn lookup_cii(date: String, policy_json: Option<String>) -> NapiResult<String> {
    let date = parse_date("date", &date)?;
    let policy = parse_policy(policy_json)?;
    let output = capital_gains::lookup_cii(date, policy.as_ref()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn classify_holding_period(
    purchase_date: String,
    sale_date: String,
    policy_json: Option<String>,
) -> NapiResult<String> {
    let purchase = parse_date("purchase_date", &purchase_date)?;
    let sale = parse_date("sale_date", &sale_date)?;
    let policy = parse_policy(policy_json)?;
    let output =
        capital_gains::classify_holding(purchase, sale, policy.as_ref()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
