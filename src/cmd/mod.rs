pub mod balances;
pub mod bracket;
pub mod rate;
pub mod report;
pub mod schema;

use crate::core::events::{self, TransactionEvent};
use crate::core::rates::RateTable;
use crate::ledger::Ledger;
use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "cryptax", version, about = "FIFO capital gains on a crypto ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Realized gains per sale, matched against buy lots first-in first-out
    Report(report::ReportCommand),
    /// Balance per currency after every event is applied
    Balances(balances::BalancesCommand),
    /// Exchange rate for a currency pair on a given date
    Rate(rate::RateCommand),
    /// Progressive bracket tax on an income
    Bracket(bracket::BracketCommand),
    /// Print the JSON schema of the ledger input
    Schema(schema::SchemaCommand),
}

impl Command {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self {
            Command::Report(cmd) => cmd.exec(),
            Command::Balances(cmd) => cmd.exec(),
            Command::Rate(cmd) => cmd.exec(),
            Command::Bracket(cmd) => cmd.exec(),
            Command::Schema(cmd) => cmd.exec(),
        }
    }
}

/// Read ledger events from a JSON file (or stdin with "-")
pub fn read_events(path: &Path) -> anyhow::Result<Vec<TransactionEvent>> {
    let reader = open_input(path)?;
    events::read_events_json(reader)
        .with_context(|| format!("reading ledger events from {}", path.display()))
}

/// Read events and ingest them all into a fresh ledger.
pub fn load_ledger(path: &Path) -> anyhow::Result<Ledger> {
    let events = read_events(path)?;
    log::info!("Ingesting {} events from {}", events.len(), path.display());
    let mut ledger = Ledger::new();
    for (i, event) in events.into_iter().enumerate() {
        let datetime = event.datetime();
        ledger
            .ingest(event)
            .with_context(|| format!("event #{} at {}", i + 1, datetime))?;
    }
    log::info!(
        "Ledger holds {} events, {} sales, {} open lots",
        ledger.events().len(),
        ledger.sales().len(),
        ledger.open_lots().len()
    );
    Ok(ledger)
}

/// Read rate observations from a CSV file (or stdin with "-")
pub fn read_rates(path: &Path) -> anyhow::Result<RateTable> {
    let reader = open_input(path)?;
    RateTable::read_csv(reader).with_context(|| format!("reading rates from {}", path.display()))
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        Ok(Box::new(io::Cursor::new(buffer)))
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

pub(crate) fn format_fiat(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
