use crate::core::{Amount, BalanceSheet, Currency, LedgerError, TransactionEvent};
use crate::tax::{LotQueue, SaleRecord, TaxEngine};
use rust_decimal::Decimal;

/// Event log, balances and tax state for one holder.
#[derive(Debug, Default)]
pub struct Ledger {
    events: Vec<TransactionEvent>,
    balances: BalanceSheet,
    taxes: TaxEngine,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Record an event: log it, update balances, open a lot for a buy and
    /// realize gains for a sell, in that order.
    ///
    /// Every check runs before the first mutation, so a rejected event leaves
    /// the ledger exactly as it was.
    pub fn ingest(&mut self, event: TransactionEvent) -> Result<(), LedgerError> {
        if let Err(e) = self.validate(&event) {
            log::warn!("Rejected event at {}: {}", event.datetime(), e);
            return Err(e);
        }

        self.events.push(event);
        let event = &self.events[self.events.len() - 1];

        event.apply(&mut self.balances)?;
        if let Some(buy) = event.as_trade().filter(|t| t.is_buy()) {
            self.taxes.add_lot(buy)?;
        }
        self.taxes.process_sale(event)?;
        Ok(())
    }

    #[cfg(test)]
    pub fn ingest_all<I>(&mut self, events: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = TransactionEvent>,
    {
        events.into_iter().try_for_each(|event| self.ingest(event))
    }

    fn validate(&self, event: &TransactionEvent) -> Result<(), LedgerError> {
        let Some(trade) = event.as_trade().map(|t| &t.trade) else {
            return Ok(());
        };
        trade.ensure_single_crypto_side()?;
        self.balances.ensure_covers(&trade.from)?;
        if trade.is_buy() {
            trade.crypto_price()?;
        } else {
            self.taxes.ensure_lots_cover(trade.from.amount())?;
        }
        Ok(())
    }

    pub fn events(&self) -> &[TransactionEvent] {
        &self.events
    }

    #[cfg(test)]
    pub fn balance(&self, currency: Currency) -> Amount {
        self.balances.balance(currency)
    }

    pub fn balances(&self) -> &BalanceSheet {
        &self.balances
    }

    pub fn sales(&self) -> &[SaleRecord] {
        self.taxes.sales()
    }

    pub fn open_lots(&self) -> &LotQueue {
        self.taxes.lots()
    }

    pub fn total_taxes(&self) -> Decimal {
        self.taxes.total_taxes()
    }

    pub fn total_taxes_in(&self, currency: Currency) -> Amount {
        self.taxes.total_taxes_in(currency)
    }
}
