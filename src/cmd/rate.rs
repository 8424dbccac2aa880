//! Rate command - resolve an exchange rate on a date

use super::read_rates;
use crate::core::rates::CurrencyPair;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RateCommand {
    /// Rate observations (CSV with pair,date,rate). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Currency pair, e.g. EUR_TO_NOK or EUR/NOK
    #[arg(short, long)]
    pair: CurrencyPair,

    /// Date to resolve (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl RateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = read_rates(&self.file)?;
        let rate = table.resolve(self.pair, self.date)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&rate)?);
        } else {
            println!("{} {} {}", rate.pair, rate.date, rate.rate);
        }
        Ok(())
    }
}
