use chrono::{DateTime, NaiveDate, Utc};

use super::{parse_amount, AmountError, Transaction, TransactionKind};

/// Raw fields of the entry form, exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub date: String,
    pub kind: TransactionKind,
    pub amount: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    Amount(AmountError),
    InvalidDate(String),
}

impl From<AmountError> for EntryError {
    fn from(err: AmountError) -> Self {
        EntryError::Amount(err)
    }
}

impl EntryForm {
    /// A blank form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            kind: TransactionKind::Expense,
            amount: String::new(),
            description: String::new(),
        }
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Clear amount and description and move the date back to `today`.
    /// The selected kind is kept.
    pub fn reset(&mut self, today: NaiveDate) {
        self.amount.clear();
        self.description.clear();
        self.date = today.format("%Y-%m-%d").to_string();
    }

    /// Validate the raw fields and build a new transaction.
    /// The amount is checked first; an empty date means `today`.
    pub fn build(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Transaction, EntryError> {
        let amount_cents = parse_amount(&self.amount)?;

        let date_str = self.date.trim();
        let date = if date_str.is_empty() {
            today
        } else {
            NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|_| EntryError::InvalidDate(date_str.to_string()))?
        };

        Ok(Transaction::new(date, self.kind, amount_cents, now)
            .with_description(self.description.trim()))
    }
}
