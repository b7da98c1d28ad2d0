//! Error type shared by the feature builders, the partitioner and the evaluator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FraudError {
    /// A time window that must contain transactions is empty
    #[error("Empty window: {0}")]
    EmptyWindow(String),

    /// Caller supplied a parameter outside its domain (k == 0, zero window, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transaction data violates a precondition (duplicate or out-of-order ids, bad amounts)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing feature column: {0}")]
    MissingFeature(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FraudError>;

impl FraudError {
    /// True when the error stems from what the caller passed in rather than from the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::InvalidInput(_) | Self::MissingFeature(_)
        )
    }
}
