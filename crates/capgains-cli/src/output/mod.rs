pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted `(key, value)` pairs.
///
/// Arrays of scalars are joined; arrays of objects are indexed
/// (`strategies.0.tax_saved`).
pub fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join_key(prefix, key), val, out);
            }
        }
        Value::Array(arr) if arr.iter().any(Value::is_object) => {
            for (i, item) in arr.iter().enumerate() {
                flatten(&join_key(prefix, &i.to_string()), item, out);
            }
        }
        _ => out.push((prefix.to_string(), scalar_string(value))),
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Render a leaf value as text; nulls become empty.
pub fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar_string).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_and_arrays() {
        let value = json!({
            "holding_period": { "months": 132, "is_long_term": true },
            "strategies": [{ "section": "54EC" }, { "section": "54" }],
            "warnings": ["a", "b"],
            "improvement_cii": null
        });
        let mut out = Vec::new();
        flatten("", &value, &mut out);

        assert!(out.contains(&("holding_period.months".into(), "132".into())));
        assert!(out.contains(&("holding_period.is_long_term".into(), "true".into())));
        assert!(out.contains(&("strategies.1.section".into(), "54".into())));
        assert!(out.contains(&("warnings".into(), "a, b".into())));
        assert!(out.contains(&("improvement_cii".into(), String::new())));
    }
}
