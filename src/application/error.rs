use thiserror::Error;

use crate::domain::{AmountError, EntryError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please enter an amount.")]
    MissingAmount,

    #[error("Enter a positive number for amount.")]
    InvalidAmount,

    #[error("Enter a date as YYYY-MM-DD (got '{0}').")]
    InvalidDate(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// Validation problems the user can fix by correcting the form.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, AppError::Storage(_))
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::Amount(AmountError::Missing) => AppError::MissingAmount,
            EntryError::Amount(AmountError::Invalid) => AppError::InvalidAmount,
            EntryError::InvalidDate(date) => AppError::InvalidDate(date),
        }
    }
}
