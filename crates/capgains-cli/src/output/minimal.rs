use serde_json::Value;

use super::scalar_string;

/// JSON pointers into `result`, most important first.
const PRIORITY_POINTERS: [&str; 6] = [
    "/active_result/total_tax",
    "/net_maturity_value",
    "/value",
    "/months",
    "/total_tax",
    "/net_cash_in_hand",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(val) = PRIORITY_POINTERS
        .iter()
        .filter_map(|p| result_obj.pointer(p))
        .find(|v| !v.is_null())
    {
        println!("{}", scalar_string(val));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_string(val));
            return;
        }
    }

    println!("{}", scalar_string(result_obj));
}
