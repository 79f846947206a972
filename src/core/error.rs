use crate::core::instant::Instant;
use crate::core::unit::TimeUnit;

pub type Result<T> = std::result::Result<T, TimespanError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimespanError {
    #[error("invalid date input: {reason}")]
    InvalidInstant { reason: String },

    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: Instant, end: Instant },

    #[error("invalid {unit} amount: {amount}")]
    InvalidUnitAmount { unit: TimeUnit, amount: i64 },

    #[error("invalid unit: {token}")]
    InvalidUnit { token: String },

    #[error("invalid input string: {reason}")]
    InvalidInput { reason: String },
}

impl TimespanError {
    pub(crate) fn instant(reason: impl Into<String>) -> Self {
        Self::InvalidInstant {
            reason: reason.into(),
        }
    }

    pub(crate) fn input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn unit(token: impl Into<String>) -> Self {
        Self::InvalidUnit {
            token: token.into(),
        }
    }
}
