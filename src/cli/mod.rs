use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{LedgerController, LedgerService, Outcome};
use crate::domain::{EntryForm, TransactionId, TransactionKind, DEFAULT_CURRENCY};

mod terminal;

pub use terminal::*;

/// Tally - Income & Expense Ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A local-first income and expense ledger with a running balance")]
#[command(version)]
pub struct Cli {
    /// Directory holding the ledger data
    #[arg(long, env = "TALLY_DATA_DIR", default_value = ".tally", global = true)]
    pub data_dir: PathBuf,

    /// Currency code used to display amounts (e.g., USD, EUR)
    #[arg(long, env = "TALLY_CURRENCY", default_value = DEFAULT_CURRENCY, global = true)]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an income or expense entry
    Add {
        /// Amount (e.g., "50.00" or "50")
        amount: Option<String>,

        /// Entry type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Date of the entry (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Description of the entry
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show all entries, totals and the balance
    List,

    /// Delete an entry
    Delete {
        /// Transaction ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every entry
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export entries to CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<Outcome> {
        tracing::debug!(data_dir = %self.data_dir.display(), currency = %self.currency, "opening ledger");
        let service = LedgerService::open(&self.data_dir, &self.currency);

        match self.command {
            Commands::Add {
                amount,
                kind,
                date,
                description,
            } => {
                let kind = TransactionKind::from_str(&kind).ok_or_else(|| {
                    anyhow::anyhow!("Invalid type '{}'. Valid types: income, expense", kind)
                })?;

                let mut form = EntryForm::new(service.clock().today())
                    .with_kind(kind)
                    .with_amount(amount.unwrap_or_default());
                if let Some(date) = date {
                    form = form.with_date(date);
                }
                if let Some(description) = description {
                    form = form.with_description(description);
                }

                let mut controller =
                    LedgerController::new(service, TerminalView::stdout(), StdinConfirm::new(false));
                Ok(controller.on_submit(&form)?)
            }

            Commands::List => {
                let mut controller =
                    LedgerController::new(service, TerminalView::stdout(), StdinConfirm::new(false));
                controller.render();
                Ok(Outcome::Applied)
            }

            Commands::Delete { id, yes } => {
                let id = TransactionId::from(id);
                if service.get_transaction(&id).is_none() {
                    tracing::debug!(id = %id, "no transaction with this id");
                }

                let mut controller =
                    LedgerController::new(service, TerminalView::stdout(), StdinConfirm::new(yes));
                let outcome = controller.on_delete(&id)?;
                if outcome == Outcome::Declined {
                    eprintln!("Cancelled.");
                }
                Ok(outcome)
            }

            Commands::Reset { yes } => {
                let mut controller =
                    LedgerController::new(service, TerminalView::stdout(), StdinConfirm::new(yes));
                let outcome = controller.on_reset()?;
                if outcome == Outcome::Declined {
                    eprintln!("Cancelled.");
                }
                Ok(outcome)
            }

            Commands::Export { format, output } => {
                run_export_command(&service, &self.currency, &format, output.as_deref())?;
                Ok(Outcome::Applied)
            }
        }
    }
}

fn run_export_command<B: crate::storage::StorageBackend>(
    service: &LedgerService<B>,
    currency: &str,
    format: &str,
    output: Option<&std::path::Path>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service.transactions(), currency);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        "csv" => exporter.export_csv(writer)?,
        "json" => exporter.export_json(writer)?,
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    };

    if let Some(path) = output {
        eprintln!("Exported {} transactions to {}", count, path.display());
    }
    Ok(())
}
