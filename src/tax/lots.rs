use crate::core::error::LedgerError;
use crate::core::events::TradeEvent;
use crate::core::money::number;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::VecDeque;

/// Crypto bought in one trade that has not been sold yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenLot {
    amount_left: Decimal,
    buy_price: Decimal,
    trade: TradeEvent,
}

impl OpenLot {
    pub fn amount_left(&self) -> Decimal {
        self.amount_left
    }

    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    pub fn trade(&self) -> &TradeEvent {
        &self.trade
    }
}

/// Portion taken from the head lot by [`LotQueue::draw`].
#[derive(Debug, Clone)]
pub struct LotDraw {
    pub quantity: Decimal,
    /// Left in the lot after this draw
    pub amount_left: Decimal,
    pub buy_price: Decimal,
    pub trade: TradeEvent,
}

/// Open buy lots in the order they were bought.
#[derive(Debug, Default)]
pub struct LotQueue {
    lots: VecDeque<OpenLot>,
}

impl LotQueue {
    /// Open a lot for the crypto received in `trade`.
    ///
    /// The lot is priced here, so a buy with no price
    /// ([`LedgerError::ZeroAmountTrade`]) never enters the queue.
    pub fn push(&mut self, trade: &TradeEvent) -> Result<(), LedgerError> {
        let lot = OpenLot {
            amount_left: number(trade.trade.to.amount()),
            buy_price: trade.trade.crypto_price()?,
            trade: trade.clone(),
        };
        log::debug!(
            "LOT OPEN: {} bought {} at {}. Open lots: {}",
            lot.amount_left,
            trade.datetime,
            lot.buy_price,
            self.lots.len() + 1
        );
        self.lots.push_back(lot);
        Ok(())
    }

    /// Take up to `wanted` from the oldest lot, closing it once nothing is left.
    pub fn draw(&mut self, wanted: Decimal) -> Option<LotDraw> {
        let head = self.lots.front_mut()?;
        let quantity = wanted.min(head.amount_left);
        head.amount_left = number(head.amount_left - quantity);
        let draw = LotDraw {
            quantity,
            amount_left: head.amount_left,
            buy_price: head.buy_price,
            trade: head.trade.clone(),
        };
        if head.amount_left.is_zero() {
            log::debug!("LOT CLOSE: bought {}", head.trade.datetime);
            self.lots.pop_front();
        }
        Some(draw)
    }

    pub fn total_open(&self) -> Decimal {
        number(self.lots.iter().map(|lot| lot.amount_left).sum())
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenLot> {
        self.lots.iter()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}
