use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{sorted_for_display, to_major_units, Transaction};

/// Full ledger export with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub currency: String,
    pub transactions: Vec<Transaction>,
}

/// Writes the ledger, newest first, to CSV or JSON.
pub struct Exporter<'a> {
    transactions: &'a [Transaction],
    currency: String,
}

impl<'a> Exporter<'a> {
    pub fn new(transactions: &'a [Transaction], currency: impl Into<String>) -> Self {
        Self {
            transactions,
            currency: currency.into(),
        }
    }

    /// Export transactions to CSV format. Returns the number of rows written.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "type",
            "amount_cents",
            "amount",
            "currency",
            "description",
            "created_at",
        ])?;

        let mut count = 0;
        for tx in sorted_for_display(self.transactions) {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.date.format("%Y-%m-%d").to_string(),
                tx.kind.to_string(),
                tx.amount_cents.to_string(),
                format!("{:.2}", to_major_units(tx.kind.signed(tx.amount_cents))),
                self.currency.clone(),
                tx.description.clone(),
                tx.created_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush().context("Failed to flush CSV output")?;
        Ok(count)
    }

    /// Export transactions as a pretty-printed JSON document.
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let export = LedgerExport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            currency: self.currency.clone(),
            transactions: sorted_for_display(self.transactions)
                .into_iter()
                .cloned()
                .collect(),
        };

        serde_json::to_writer_pretty(&mut writer, &export).context("Failed to write JSON")?;
        writeln!(writer)?;
        Ok(export.transactions.len())
    }
}
