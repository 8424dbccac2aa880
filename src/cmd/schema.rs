//! Schema command - print the expected ledger input format

use crate::core::events::LedgerInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = schema_for!(LedgerInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
