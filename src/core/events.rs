use super::balance::BalanceSheet;
use super::error::LedgerError;
use super::money::{deserialize_scaled, number, Amount};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Input root for ledger JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LedgerInput {
    pub events: Vec<TransactionEvent>,
}

/// Exchange of one currency for another. Exactly one side is expected to be crypto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Trade {
    pub from: Amount,
    pub to: Amount,
    #[serde(default, deserialize_with = "deserialize_scaled")]
    #[schemars(with = "f64")]
    pub fee: Decimal,
}

impl Trade {
    #[cfg(test)]
    pub fn new(from: Amount, to: Amount, fee: Decimal) -> Self {
        Trade {
            from,
            to,
            fee: number(fee),
        }
    }

    /// Buying crypto: the destination is a crypto asset.
    pub fn is_buy(&self) -> bool {
        self.to.currency().is_crypto()
    }

    /// Selling crypto: the destination is fiat.
    pub fn is_sell(&self) -> bool {
        !self.is_buy()
    }

    /// Fiat paid per unit of crypto.
    pub fn crypto_price(&self) -> Result<Decimal, LedgerError> {
        let (fiat, crypto) = if self.is_buy() {
            (self.from.amount(), self.to.amount())
        } else {
            (self.to.amount(), self.from.amount())
        };
        fiat.checked_div(crypto)
            .map(number)
            .ok_or(LedgerError::ZeroAmountTrade {
                from: self.from,
                to: self.to,
            })
    }

    pub fn ensure_single_crypto_side(&self) -> Result<(), LedgerError> {
        if self.from.currency().is_crypto() == self.to.currency().is_crypto() {
            return Err(LedgerError::UnsupportedTrade {
                from: self.from.currency(),
                to: self.to.currency(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Deposit {
    #[schemars(with = "String")]
    pub datetime: NaiveDateTime,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TradeEvent {
    #[schemars(with = "String")]
    pub datetime: NaiveDateTime,
    pub trade: Trade,
}

impl TradeEvent {
    pub fn is_buy(&self) -> bool {
        self.trade.is_buy()
    }

    pub fn is_sell(&self) -> bool {
        self.trade.is_sell()
    }
}

/// An entry in the ledger's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum TransactionEvent {
    /// Funds received into the holder's account
    Deposit(Deposit),
    /// Exchange between a fiat currency and a crypto asset
    Trade(TradeEvent),
}

impl TransactionEvent {
    #[cfg(test)]
    pub fn deposit(amount: Amount, datetime: NaiveDateTime) -> Self {
        TransactionEvent::Deposit(Deposit { datetime, amount })
    }

    #[cfg(test)]
    pub fn trade(trade: Trade, datetime: NaiveDateTime) -> Self {
        TransactionEvent::Trade(TradeEvent { datetime, trade })
    }

    pub fn datetime(&self) -> NaiveDateTime {
        match self {
            TransactionEvent::Deposit(d) => d.datetime,
            TransactionEvent::Trade(t) => t.datetime,
        }
    }

    pub fn as_trade(&self) -> Option<&TradeEvent> {
        match self {
            TransactionEvent::Trade(t) => Some(t),
            TransactionEvent::Deposit(_) => None,
        }
    }

    /// Apply this event to the balances.
    ///
    /// A trade fails with [`LedgerError::InsufficientBalance`] before anything is
    /// touched when the source balance does not cover it.
    pub fn apply(&self, balances: &mut BalanceSheet) -> Result<(), LedgerError> {
        match self {
            TransactionEvent::Deposit(deposit) => {
                balances.credit(&deposit.amount);
            }
            TransactionEvent::Trade(TradeEvent { trade, .. }) => {
                balances.debit(&trade.from)?;
                balances.credit(&trade.to);
            }
        }
        Ok(())
    }
}

/// Read ledger events from JSON, ordered by time.
///
/// The sort is stable, so events sharing a timestamp keep their input order.
pub fn read_events_json<R: Read>(reader: R) -> anyhow::Result<Vec<TransactionEvent>> {
    let input: LedgerInput = serde_json::from_reader(reader)?;
    let mut events = input.events;
    events.sort_by_key(TransactionEvent::datetime);
    Ok(events)
}
