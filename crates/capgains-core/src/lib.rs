pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "capital_gains")]
pub mod capital_gains;

pub use error::CapGainsError;
pub use types::*;

/// Standard result type for all capital-gains operations
pub type CapGainsResult<T> = Result<T, CapGainsError>;
