use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use crate::application::{Confirm, LedgerPage, LedgerView};

const DESCRIPTION_WIDTH: usize = 30;

/// Plain-text rendering of the ledger.
pub struct TerminalView<W: Write> {
    out: W,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LedgerView for TerminalView<W> {
    fn render(&mut self, page: &LedgerPage) {
        if let Err(err) = write_page(&mut self.out, page) {
            tracing::warn!(error = %err, "failed to write ledger");
        }
    }

    fn report(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn reset_form(&mut self, today: NaiveDate) {
        tracing::debug!(%today, "entry form reset");
    }
}

/// Write the ledger as a table followed by the totals.
pub fn write_page<W: Write>(out: &mut W, page: &LedgerPage) -> io::Result<()> {
    if page.is_empty {
        writeln!(out, "No transactions yet.")?;
    } else {
        writeln!(
            out,
            "{:<10}  {:<width$}  {:>14}  {}",
            "DATE",
            "DESCRIPTION",
            "AMOUNT",
            "ID",
            width = DESCRIPTION_WIDTH
        )?;
        writeln!(out, "{}", "-".repeat(70))?;
        for row in &page.rows {
            writeln!(
                out,
                "{:<10}  {:<width$}  {:>14}  {}",
                row.date.format("%Y-%m-%d"),
                truncate(&row.description, DESCRIPTION_WIDTH),
                row.amount,
                row.id,
                width = DESCRIPTION_WIDTH
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Income:   {}", page.total_income)?;
    writeln!(out, "Expenses: {}", page.total_expenses)?;
    match page.balance_class.css_class() {
        Some(class) => writeln!(out, "Balance:  {} ({})", page.balance, class)?,
        None => writeln!(out, "Balance:  {}", page.balance)?,
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

/// Asks on stderr and reads the answer from stdin. Anything but "y"/"yes" declines.
pub struct StdinConfirm {
    assume_yes: bool,
}

impl StdinConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
