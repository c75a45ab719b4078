use serde_json::Value;
use std::io;

use super::flatten;

/// Write output as a two-column `field,value` CSV to stdout.
///
/// Nested result fields are flattened to dotted keys, so the whole
/// result (including every strategy) fits one stream.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let mut rows = Vec::new();
    flatten("", body, &mut rows);

    if let Err(e) = write_rows(&mut wtr, &rows) {
        tracing::error!(error = %e, "CSV write failed");
    }
}

fn write_rows<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    rows: &[(String, String)],
) -> Result<(), csv::Error> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in rows {
        wtr.write_record([key.as_str(), val.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
