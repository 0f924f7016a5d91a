use std::cmp::Ordering;

use super::{Cents, Transaction, TransactionKind};

/// Aggregate totals over a set of transactions.
/// Invariant: `total_income - total_expenses == balance`.
/// Sums saturate at the `i64` bounds instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_income: Cents,
    pub total_expenses: Cents,
}

impl Totals {
    pub fn record(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Income => {
                self.total_income = self.total_income.saturating_add(transaction.amount_cents)
            }
            TransactionKind::Expense => {
                self.total_expenses = self.total_expenses.saturating_add(transaction.amount_cents)
            }
        }
    }

    pub fn balance(&self) -> Cents {
        self.total_income.saturating_sub(self.total_expenses)
    }

    pub fn balance_class(&self) -> BalanceClass {
        BalanceClass::of(self.balance())
    }
}

/// Solvency signal attached to the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceClass {
    Positive,
    Negative,
    /// Balance is exactly zero
    Neutral,
}

impl BalanceClass {
    pub fn of(balance: Cents) -> Self {
        match balance.cmp(&0) {
            Ordering::Less => BalanceClass::Negative,
            Ordering::Greater => BalanceClass::Positive,
            Ordering::Equal => BalanceClass::Neutral,
        }
    }

    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            BalanceClass::Positive => Some("positive"),
            BalanceClass::Negative => Some("negative"),
            BalanceClass::Neutral => None,
        }
    }
}

/// Display order: newest date first, then most recently recorded first.
/// Identical timestamps fall back to the id so the order stays total.
pub fn display_order(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Borrow the transactions in display order.
pub fn sorted_for_display(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| display_order(a, b));
    sorted
}
