//! Report command - realized gains per sale

use super::{format_fiat, load_ledger};
use crate::core::money::Currency;
use crate::ledger::Ledger;
use crate::tax::fifo::SaleRecord;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Ledger events file (JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "Sold")]
    sold_on: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Sell Price")]
    sell_price: String,
    #[tabled(rename = "Lot Bought")]
    bought_on: String,
    #[tabled(rename = "Buy Price")]
    buy_price: String,
    #[tabled(rename = "Lot Left")]
    lot_left: String,
    #[tabled(rename = "Gain")]
    gain: String,
}

#[derive(Serialize)]
struct ReportData<'a> {
    sales: &'a [SaleRecord],
    total_gain: String,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let ledger = load_ledger(&self.file)?;
        if self.json {
            let data = ReportData {
                sales: ledger.sales(),
                total_gain: ledger.total_taxes().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            print_report(&ledger);
        }
        Ok(())
    }
}

fn print_report(ledger: &Ledger) {
    let sales = ledger.sales();
    if sales.is_empty() {
        println!("No sales found");
        return;
    }

    let rows: Vec<MatchRow> = sales
        .iter()
        .flat_map(|sale| {
            sale.matches.iter().map(move |m| MatchRow {
                sold_on: sale.datetime.format("%Y-%m-%d %H:%M").to_string(),
                quantity: m.quantity.to_string(),
                sell_price: m.sell_price.to_string(),
                bought_on: m.buy_trade.datetime.format("%Y-%m-%d %H:%M").to_string(),
                buy_price: m.buy_price.to_string(),
                lot_left: m.lot_amount_left.to_string(),
                gain: format_fiat(m.gain),
            })
        })
        .collect();

    println!();
    println!("REALIZED GAINS (FIFO)");
    println!();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
    println!("Sales: {}", sales.len());
    for currency in Currency::ALL.into_iter().filter(|c| !c.is_crypto()) {
        if sales.iter().any(|s| s.proceeds_currency == currency) {
            let total = ledger.total_taxes_in(currency);
            println!("Gain ({}): {}", currency, format_fiat(total.amount()));
        }
    }
    println!("Total gain: {}", format_fiat(ledger.total_taxes()));
    if !ledger.open_lots().is_empty() {
        println!(
            "Open lots: {} holding {}",
            ledger.open_lots().len(),
            ledger.open_lots().total_open()
        );
        for lot in ledger.open_lots().iter() {
            println!(
                "  {} left of {} bought {}",
                lot.amount_left(),
                lot.trade().trade.to,
                lot.trade().datetime.format("%Y-%m-%d %H:%M")
            );
        }
    }
}
