use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapGainsError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid policy: {field}: {reason}")]
    InvalidPolicy { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CapGainsError {
    fn from(e: serde_json::Error) -> Self {
        CapGainsError::SerializationError(e.to_string())
    }
}
