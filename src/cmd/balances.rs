//! Balances command - holdings per currency

use super::load_ledger;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct BalancesCommand {
    /// Ledger events file (JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled, Serialize)]
struct BalanceRow {
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

impl BalancesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = load_ledger(&self.file)?;
        let rows: Vec<BalanceRow> = ledger
            .balances()
            .iter()
            .map(|amount| BalanceRow {
                currency: amount.currency().to_string(),
                name: amount.currency().full_name().to_string(),
                balance: amount.amount().to_string(),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No balances");
            return Ok(());
        }
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
