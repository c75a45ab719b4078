use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, scalar_string};

/// Format output as tables using the tabled crate.
///
/// Scalar and nested-object fields of the result go into one
/// field/value table; each array of objects (regime results, strategies)
/// gets its own table with flattened columns.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_result_tables(result);
                print_envelope_notes(map);
            }
            _ => print_field_table(value),
        },
        Value::Array(arr) => print_array_table("", arr),
        _ => println!("{}", scalar_string(value)),
    }
}

fn print_result_tables(result: &Map<String, Value>) {
    let mut scalars = Map::new();
    let mut sections = Vec::new();

    for (key, val) in result {
        match val {
            Value::Array(arr) if arr.iter().any(Value::is_object) => sections.push((key, arr)),
            _ => {
                scalars.insert(key.clone(), val.clone());
            }
        }
    }

    print_field_table(&Value::Object(scalars));
    for (key, arr) in sections {
        println!();
        print_array_table(key, arr);
    }
}

fn print_field_table(value: &Value) {
    let mut rows = Vec::new();
    flatten("", value, &mut rows);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in rows {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(title: &str, arr: &[Value]) {
    if !title.is_empty() {
        println!("{}:", title);
    }
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Column order follows the first row; later rows may add columns
    let rows: Vec<Vec<(String, String)>> = arr
        .iter()
        .map(|item| {
            let mut row = Vec::new();
            flatten("", item, &mut row);
            row
        })
        .collect();

    let mut headers: Vec<String> = Vec::new();
    for row in &rows {
        for (key, _) in row {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
