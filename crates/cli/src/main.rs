//! `splitledger`: compute a group's balances from an exported event history.
//!
//! Prints the full group statement (pairwise balances, net balances and the
//! settlement plan) as JSON, or a single user's net balance with `--user`.

mod history;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use splitledger_core::{Money, UserId};
use splitledger_ledger::LedgerConfig;

use crate::history::{History, build_report};

#[derive(Parser, Debug)]
#[command(name = "splitledger")]
#[command(about = "Compute pairwise balances and a settlement plan for a shared-expense group")]
struct Cli {
    /// Exported group history (JSON).
    history: PathBuf,

    /// Print only this user's net balance.
    #[arg(long)]
    user: Option<UserId>,

    /// Amounts up to this many minor units count as settled.
    /// Overrides `SPLITLEDGER_ZERO_TOLERANCE`.
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    zero_tolerance: Option<i64>,
}

impl Cli {
    fn ledger_config(&self) -> anyhow::Result<LedgerConfig> {
        Ok(match self.zero_tolerance {
            Some(minor) => LedgerConfig::default().with_zero_tolerance(Money::from_minor(minor)),
            None => LedgerConfig::from_env()?,
        })
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    splitledger_observability::init();

    let config = cli.ledger_config()?;
    let history = History::load(&cli.history)?;

    let report = build_report(history, &config, cli.user)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "splitledger failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
