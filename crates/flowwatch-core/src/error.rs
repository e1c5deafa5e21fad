use thiserror::Error;

/// Rejected input to a domain constructor or config file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is NaN or infinite")]
    NonFiniteValue { field: &'static str },
    #[error("{field} cannot be negative")]
    NegativeValue { field: &'static str },

    #[error("price bar high is below its low")]
    InvalidBarRange,
    #[error("price bar open or close lies outside its high/low range")]
    InvalidBarBounds,

    #[error("'{value}' is not a YYYY-MM-DD date")]
    InvalidDate { value: String },
    #[error("'{value}' is not an RFC3339 timestamp in UTC")]
    TimestampNotUtc { value: String },

    #[error("config {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Failure loading or validating shared state such as the engine config.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("malformed JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),
}
