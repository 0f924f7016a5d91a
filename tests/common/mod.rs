// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::cell::Cell;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tally::application::{Clock, LedgerService};
use tally::domain::{EntryForm, TransactionKind};
use tally::storage::FileBackend;
use tempfile::TempDir;

/// Clock that starts at a fixed instant and advances one second per reading,
/// so consecutive entries get distinct, increasing `created_at` values.
pub struct SteppingClock {
    next: Cell<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Cell::new(start),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap())
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.next.get();
        self.next.set(now + Duration::seconds(1));
        now
    }

    fn today(&self) -> NaiveDate {
        self.next.get().date_naive()
    }
}

/// Helper to create a test service over a temporary data directory
pub fn test_service() -> Result<(LedgerService<FileBackend>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(temp_dir.path(), "USD").with_clock(SteppingClock::default());
    Ok((service, temp_dir))
}

/// Reopen the ledger stored in `dir`, as a fresh process would
pub fn reopen(dir: &TempDir) -> LedgerService<FileBackend> {
    LedgerService::open(dir.path(), "USD").with_clock(SteppingClock::default())
}

/// Helper to build a filled-in entry form
pub fn entry(kind: TransactionKind, amount: &str, date: &str) -> EntryForm {
    EntryForm::new(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        .with_kind(kind)
        .with_amount(amount)
        .with_date(date)
}

pub fn income(amount: &str) -> EntryForm {
    entry(TransactionKind::Income, amount, "")
}

pub fn expense(amount: &str) -> EntryForm {
    entry(TransactionKind::Expense, amount, "")
}
