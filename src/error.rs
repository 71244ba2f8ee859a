use std::time::Duration;

use thiserror::Error;

/// Input rejected at the form boundary. Never reaches the session stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount must be a number, got {0:?}")]
    NonNumericAmount(String),
    #[error("Amount cannot be negative")]
    NegativeAmount,
    #[error("Amount too large (maximum is {max})")]
    AmountTooLarge { max: rust_decimal::Decimal },
    #[error("Invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Invalid time {0:?} (expected HH:MM or HH:MM:SS)")]
    InvalidTime(String),
    #[error("Reminder date {0} is in the past")]
    DateInPast(chrono::NaiveDate),
}

/// Failure of an AI suggestion request.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("response contained no completion")]
    EmptyResponse,
    #[error("failed to encode expenses: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl AdvisorError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AdvisorError::Timeout(_))
    }
}
