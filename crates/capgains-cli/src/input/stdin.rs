use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped JSON from stdin into `T`.
///
/// Returns `None` when stdin is a terminal or the pipe is empty, so callers
/// can fall back to command-line flags.
pub fn read_piped<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    tracing::debug!(bytes = trimmed.len(), "reading JSON input from stdin");
    let value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin input: {}", e))?;
    Ok(Some(value))
}
