//! Bracket command - progressive step tax on an income

use super::format_fiat;
use crate::tax::bracket::BracketTable;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct BracketCommand {
    /// Yearly income in NOK
    income: Decimal,

    /// Also print the bracket table
    #[arg(long)]
    verbose: bool,
}

impl BracketCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let table = BracketTable::norwegian_step_tax_2018();
        if self.verbose {
            for bracket in table.brackets() {
                let upper = bracket.upper.map_or("-".to_string(), |u| u.to_string());
                println!(
                    "{:>10} {:>10} {:>6}%",
                    bracket.lower,
                    upper,
                    (bracket.rate * Decimal::ONE_HUNDRED).normalize()
                );
            }
        }
        println!("Step tax: {}", format_fiat(table.tax(self.income)));
        Ok(())
    }
}
