use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tally::application::Outcome;
use tally::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.run()? {
        Outcome::Rejected => Ok(ExitCode::FAILURE),
        Outcome::Applied | Outcome::Declined => Ok(ExitCode::SUCCESS),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tally=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
