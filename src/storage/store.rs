use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::domain::{Transaction, TransactionId, MAX_AMOUNT_CENTS};

use super::StorageBackend;

/// Owns the in-memory transaction list and mirrors it to a storage slot.
/// Every mutation is persisted before it returns, and the in-memory list only
/// changes once the write succeeded.
pub struct TransactionStore<B: StorageBackend> {
    backend: B,
    key: String,
    transactions: Vec<Transaction>,
    /// Raw snapshot that lost records while loading, kept until it is backed up
    unrecovered: Option<String>,
}

impl<B: StorageBackend> TransactionStore<B> {
    /// Load the snapshot stored under `key`.
    /// Missing or unreadable data yields an empty store; this never fails.
    pub fn load(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut unrecovered = None;
        let transactions = match backend.get(&key) {
            Ok(Some(raw)) => {
                let decoded = decode_snapshot(&raw);
                if decoded.lossy {
                    unrecovered = Some(raw);
                }
                decoded.transactions
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "could not read snapshot, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(key = %key, count = transactions.len(), "loaded transactions");

        Self {
            backend,
            key,
            transactions,
            unrecovered,
        }
    }

    /// Slot that receives the original snapshot when loading had to drop records.
    pub fn backup_key(&self) -> String {
        format!("{}.backup", self.key)
    }

    /// Serialize the current list and write it to the backend.
    pub fn save(&mut self) -> Result<()> {
        let snapshot = self.snapshot()?;
        self.write(&snapshot)
    }

    pub fn add(&mut self, transaction: Transaction) -> Result<()> {
        tracing::debug!(id = %transaction.id, "adding transaction");
        let mut next = self.transactions.clone();
        next.push(transaction);
        self.replace(next)
    }

    /// Remove the transaction with `id`. Returns whether one was removed;
    /// an unknown id is not an error.
    pub fn remove(&mut self, id: &TransactionId) -> Result<bool> {
        let next: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| &t.id != id)
            .cloned()
            .collect();
        let removed = next.len() != self.transactions.len();
        tracing::debug!(id = %id, removed, "removing transaction");
        self.replace(next)?;
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        tracing::debug!(count = self.transactions.len(), "clearing transactions");
        self.replace(Vec::new())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The exact string `save` writes.
    pub fn snapshot(&self) -> Result<String> {
        serialize(&self.transactions)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Persist `next` and adopt it only if the write succeeded.
    fn replace(&mut self, next: Vec<Transaction>) -> Result<()> {
        let snapshot = serialize(&next)?;
        self.write(&snapshot)?;
        self.transactions = next;
        Ok(())
    }

    fn write(&mut self, snapshot: &str) -> Result<()> {
        if let Some(raw) = &self.unrecovered {
            let backup_key = self.backup_key();
            self.backend
                .set(&backup_key, raw)
                .context("Failed to back up the original snapshot")?;
            tracing::warn!(key = %backup_key, "original snapshot backed up before overwrite");
            self.unrecovered = None;
        }

        self.backend
            .set(&self.key, snapshot)
            .context("Failed to persist transactions")
    }
}

fn serialize(transactions: &[Transaction]) -> Result<String> {
    serde_json::to_string(transactions).context("Failed to serialize transactions")
}

struct DecodedSnapshot {
    transactions: Vec<Transaction>,
    /// Something in the raw snapshot could not be kept
    lossy: bool,
}

/// Decode a persisted snapshot, keeping every well-formed record.
/// Anything that is not a JSON array decodes to an empty list.
fn decode_snapshot(raw: &str) -> DecodedSnapshot {
    if raw.trim().is_empty() {
        return DecodedSnapshot {
            transactions: Vec::new(),
            lossy: false,
        };
    }

    let items: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, "snapshot is not a transaction array, starting empty");
            return DecodedSnapshot {
                transactions: Vec::new(),
                lossy: true,
            };
        }
    };

    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(items.len());
    let mut lossy = false;
    for (index, item) in items.into_iter().enumerate() {
        let tx: Transaction = match serde_json::from_value(item.clone()) {
            Ok(tx) => tx,
            Err(err) => {
                tracing::warn!(index, error = %err, record = %item, "skipping malformed transaction");
                lossy = true;
                continue;
            }
        };
        if tx.amount_cents <= 0 || tx.amount_cents > MAX_AMOUNT_CENTS {
            tracing::warn!(index, record = %item, "skipping transaction with out-of-range amount");
            lossy = true;
            continue;
        }
        if !seen.insert(tx.id.clone()) {
            tracing::warn!(index, record = %item, "skipping transaction with duplicate id");
            lossy = true;
            continue;
        }
        transactions.push(tx);
    }

    DecodedSnapshot {
        transactions,
        lossy,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::TransactionKind;
    use crate::storage::{MemoryBackend, STORAGE_KEY};

    fn sample(amount: i64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Transaction::new(date, TransactionKind::Expense, amount, Utc::now())
    }

    fn empty_store() -> TransactionStore<MemoryBackend> {
        TransactionStore::load(MemoryBackend::new(), STORAGE_KEY)
    }

    #[test]
    fn test_load_absent_slot() {
        let store = empty_store();
        assert!(store.is_empty());
        assert_eq!(store.backend().writes(), 0);
    }

    #[test]
    fn test_load_recovers_from_garbage() {
        for raw in ["", "   ", "not json", "{\"id\":1}", "42", "null", "[1,2"] {
            let backend = MemoryBackend::new().with_slot(STORAGE_KEY, raw);
            let store = TransactionStore::load(backend, STORAGE_KEY);
            assert!(store.is_empty(), "raw: {raw}");
        }
    }

    #[test]
    fn test_load_skips_bad_records() {
        let raw = r#"[
            {"id":"a","date":"2024-01-01","type":"income","amountCents":500,"description":"ok","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"b","date":"garbage","type":"income","amountCents":500,"description":"","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"c","date":"2024-01-01","type":"expense","amountCents":0,"description":"","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"a","date":"2024-01-02","type":"expense","amountCents":100,"description":"dup","createdAt":"2024-01-02T00:00:00Z"},
            "oops"
        ]"#;
        let backend = MemoryBackend::new().with_slot(STORAGE_KEY, raw);
        let store = TransactionStore::load(backend, STORAGE_KEY);

        assert_eq!(store.len(), 1);
        assert_eq!(store.transactions()[0].description, "ok");
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut store = empty_store();
        let tx = sample(1000);
        let id = tx.id.clone();

        store.add(tx).unwrap();
        assert_eq!(store.backend().writes(), 1);

        store.remove(&id).unwrap();
        assert_eq!(store.backend().writes(), 2);

        store.clear().unwrap();
        assert_eq!(store.backend().writes(), 3);
        assert_eq!(store.backend().slot(STORAGE_KEY), Some("[]"));
    }

    #[test]
    fn test_remove_unknown_id_keeps_snapshot() {
        let mut store = empty_store();
        store.add(sample(1000)).unwrap();
        store.add(sample(2500)).unwrap();
        let before = store.backend().slot(STORAGE_KEY).unwrap().to_string();

        let removed = store.remove(&TransactionId::from("missing")).unwrap();

        assert!(!removed);
        assert_eq!(store.len(), 2);
        assert_eq!(store.backend().slot(STORAGE_KEY), Some(before.as_str()));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut store = empty_store();
        store.add(sample(1000).with_description("coffee")).unwrap();
        store.add(sample(2500)).unwrap();
        store.save().unwrap();
        assert_eq!(store.backend().writes(), 3);
        let original = store.transactions().to_vec();

        let reloaded = TransactionStore::load(store.into_backend(), STORAGE_KEY);
        assert_eq!(reloaded.transactions(), original.as_slice());
    }

    #[test]
    fn test_get_by_id() {
        let mut store = empty_store();
        let tx = sample(700);
        let id = tx.id.clone();
        store.add(tx).unwrap();

        assert_eq!(store.get(&id).map(|t| t.amount_cents), Some(700));
        assert!(store.get(&TransactionId::from("nope")).is_none());
    }

    /// Backend whose writes can be switched off.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_writes: bool,
    }

    impl StorageBackend for FlakyBackend {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                anyhow::bail!("disk full");
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_failed_write_leaves_memory_untouched() {
        let mut store = TransactionStore::load(FlakyBackend::default(), STORAGE_KEY);
        let kept = sample(1000);
        store.add(kept.clone()).unwrap();
        store.backend.fail_writes = true;

        assert!(store.add(sample(2000)).is_err());
        assert!(store.remove(&kept.id).is_err());
        assert!(store.clear().is_err());

        assert_eq!(store.transactions(), std::slice::from_ref(&kept));
        assert_eq!(
            store.backend().inner.slot(STORAGE_KEY),
            Some(store.snapshot().unwrap().as_str())
        );
    }

    #[test]
    fn test_skips_out_of_range_amount() {
        let raw = format!(
            r#"[{{"id":"big","date":"2024-01-01","type":"income","amountCents":{},"description":"","createdAt":"2024-01-01T00:00:00Z"}},
               {{"id":"max","date":"2024-01-01","type":"income","amountCents":{},"description":"","createdAt":"2024-01-01T00:00:00Z"}}]"#,
            MAX_AMOUNT_CENTS + 1,
            MAX_AMOUNT_CENTS
        );
        let store = TransactionStore::load(MemoryBackend::new().with_slot(STORAGE_KEY, raw), STORAGE_KEY);

        assert_eq!(store.len(), 1);
        assert_eq!(store.transactions()[0].id.as_str(), "max");
    }

    #[test]
    fn test_lossy_snapshot_is_backed_up_once() {
        let raw = r#"[{"id":"a","date":"2024-01-01","type":"income","amountCents":500,"description":"","createdAt":"2024-01-01T00:00:00Z"}, "oops"]"#;
        let mut store =
            TransactionStore::load(MemoryBackend::new().with_slot(STORAGE_KEY, raw), STORAGE_KEY);
        let backup_key = store.backup_key();
        assert_eq!(store.backend().slot(&backup_key), None);

        store.add(sample(100)).unwrap();
        assert_eq!(store.backend().slot(&backup_key), Some(raw));
        assert_eq!(store.backend().writes(), 2);

        store.clear().unwrap();
        assert_eq!(store.backend().writes(), 3);
        assert_eq!(store.backend().slot(&backup_key), Some(raw));
    }

    #[test]
    fn test_clean_snapshot_is_not_backed_up() {
        let mut store = empty_store();
        store.add(sample(100)).unwrap();
        let mut reloaded = TransactionStore::load(store.into_backend(), STORAGE_KEY);
        reloaded.clear().unwrap();

        assert_eq!(reloaded.backend().slot(&reloaded.backup_key()), None);
    }
}
