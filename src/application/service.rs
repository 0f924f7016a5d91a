use std::path::Path;

use crate::domain::{EntryForm, Totals, Transaction, TransactionId};
use crate::storage::{FileBackend, StorageBackend, TransactionStore, STORAGE_KEY};

use super::{AppError, Clock, LedgerPage, Presenter, SystemClock};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, tests, other front-ends).
pub struct LedgerService<B: StorageBackend> {
    store: TransactionStore<B>,
    presenter: Presenter,
    clock: Box<dyn Clock>,
}

impl LedgerService<FileBackend> {
    /// Open the ledger stored in `data_dir`, formatting amounts in `currency`.
    pub fn open(data_dir: impl AsRef<Path>, currency: &str) -> Self {
        let backend = FileBackend::new(data_dir.as_ref());
        Self::new(
            TransactionStore::load(backend, STORAGE_KEY),
            Presenter::for_currency(currency),
        )
    }
}

impl<B: StorageBackend> LedgerService<B> {
    pub fn new(store: TransactionStore<B>, presenter: Presenter) -> Self {
        Self {
            store,
            presenter,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // ========================
    // Ledger operations
    // ========================

    /// Validate a submitted form and record the resulting transaction.
    /// Nothing is stored or persisted when validation fails.
    pub fn add_entry(&mut self, form: &EntryForm) -> Result<Transaction, AppError> {
        let transaction = form.build(self.clock.today(), self.clock.now())?;
        self.store.add(transaction.clone())?;
        tracing::debug!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount_cents = transaction.amount_cents,
            "recorded transaction"
        );
        Ok(transaction)
    }

    /// Delete a transaction. Returns false when no transaction has that id.
    pub fn delete_transaction(&mut self, id: &TransactionId) -> Result<bool, AppError> {
        Ok(self.store.remove(id)?)
    }

    /// Remove every transaction.
    pub fn reset(&mut self) -> Result<(), AppError> {
        Ok(self.store.clear()?)
    }

    // ========================
    // Queries
    // ========================

    pub fn transactions(&self) -> &[Transaction] {
        self.store.transactions()
    }

    pub fn get_transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.store.get(id)
    }

    pub fn totals(&self) -> Totals {
        self.page().totals
    }

    /// Sorted rows, totals and balance for display.
    pub fn page(&self) -> LedgerPage {
        self.presenter.present(self.store.transactions())
    }

    pub fn store(&self) -> &TransactionStore<B> {
        &self.store
    }
}
