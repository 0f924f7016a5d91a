use chrono::NaiveDate;

use crate::domain::{
    sorted_for_display, BalanceClass, Cents, CurrencyFormatter, MoneyFormatter, Totals,
    Transaction, TransactionId, TransactionKind,
};

/// Placeholder shown for entries recorded without a description.
pub const NO_DESCRIPTION: &str = "(no description)";

/// One rendered ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount_cents: Cents,
    pub description: String,
    /// Formatted amount with a leading `+` (income) or `-` (expense)
    pub amount: String,
}

/// Everything a view needs to draw the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPage {
    pub rows: Vec<RowView>,
    pub totals: Totals,
    pub total_income: String,
    pub total_expenses: String,
    pub balance: String,
    pub balance_class: BalanceClass,
    pub is_empty: bool,
}

impl LedgerPage {
    pub fn balance_cents(&self) -> Cents {
        self.totals.balance()
    }
}

/// Derives the sorted rows and totals from the current transactions.
/// Nothing is cached; every call recomputes from scratch.
pub struct Presenter {
    formatter: Box<dyn MoneyFormatter>,
}

impl Presenter {
    pub fn new(formatter: impl MoneyFormatter + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
        }
    }

    pub fn for_currency(code: &str) -> Self {
        Self::new(CurrencyFormatter::new(code))
    }

    pub fn present(&self, transactions: &[Transaction]) -> LedgerPage {
        let mut totals = Totals::default();
        let rows = sorted_for_display(transactions)
            .into_iter()
            .map(|tx| {
                totals.record(tx);
                self.row(tx)
            })
            .collect();

        LedgerPage {
            rows,
            totals,
            total_income: self.formatter.format_cents(totals.total_income),
            total_expenses: self.formatter.format_cents(totals.total_expenses),
            balance: self.formatter.format_cents(totals.balance()),
            balance_class: totals.balance_class(),
            is_empty: transactions.is_empty(),
        }
    }

    fn row(&self, tx: &Transaction) -> RowView {
        let description = if tx.description.is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            tx.description.clone()
        };

        RowView {
            id: tx.id.clone(),
            date: tx.date,
            kind: tx.kind,
            amount_cents: tx.amount_cents,
            description,
            amount: format!(
                "{}{}",
                tx.kind.sign(),
                self.formatter.format_cents(tx.amount_cents)
            ),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(CurrencyFormatter::default())
    }
}
