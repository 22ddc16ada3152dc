use thiserror::Error;

/// Errors raised by the indicator engine.
///
/// Insufficient history is deliberately not represented here: engines answer
/// it with an empty series or `None`.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid period for {indicator}: {period}")]
    InvalidPeriod { indicator: &'static str, period: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid market snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Data source error: {0}")]
    Source(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl SignalError {
    /// Shorthand for a rejected window length.
    pub fn invalid_period(indicator: &'static str, period: usize) -> Self {
        SignalError::InvalidPeriod { indicator, period }
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;
