use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SavingsError {
    #[error("invalid date format: {message}")]
    Format {
        message: String,
    },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
    },

    #[error("withdrawal recorded before a deposit on {date}: deposits must be applied before withdrawals on the same day")]
    Sequencing {
        date: NaiveDate,
    },

    #[error("insufficient balance on {date}: balance {balance}, withdrawal {requested}")]
    InsufficientBalance {
        date: NaiveDate,
        balance: Money,
        requested: Money,
    },

    #[error("no deposit rate data available within {lookback_days} business days")]
    RateUnavailable {
        lookback_days: u32,
    },
}

impl SavingsError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        SavingsError::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        SavingsError::Format {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SavingsError>;
