use super::lots::LotQueue;
use crate::core::error::LedgerError;
use crate::core::events::{TradeEvent, TransactionEvent};
use crate::core::money::{number, Amount, Currency};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Part of a sale matched against one buy lot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LotMatch {
    pub quantity: Decimal,
    pub sell_price: Amount,
    /// Left in the matched lot after this sale
    pub lot_amount_left: Decimal,
    pub buy_price: Decimal,
    pub buy_trade: TradeEvent,
    pub gain: Decimal,
}

/// A complete sell and the lots it consumed, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub datetime: NaiveDateTime,
    pub quantity: Decimal,
    pub sell_price: Decimal,
    pub proceeds_currency: Currency,
    pub matches: Vec<LotMatch>,
}

impl SaleRecord {
    pub fn gain(&self) -> Decimal {
        self.matches.iter().map(|m| m.gain).sum()
    }
}

/// Realized gains from matching sells against buy lots first-in first-out.
#[derive(Debug, Default)]
pub struct TaxEngine {
    lots: LotQueue,
    sales: Vec<SaleRecord>,
}

impl TaxEngine {
    pub fn add_lot(&mut self, trade: &TradeEvent) -> Result<(), LedgerError> {
        self.lots.push(trade)
    }

    pub fn lots(&self) -> &LotQueue {
        &self.lots
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Match a sell against the open lots and record the realized gain.
    ///
    /// Returns `None` for anything that is not a sell. Fails with
    /// [`LedgerError::InsufficientLots`] before consuming any lot when the open
    /// lots cannot cover the sale. A zero-quantity sell is recorded with no
    /// matches.
    pub fn process_sale(
        &mut self,
        event: &TransactionEvent,
    ) -> Result<Option<&SaleRecord>, LedgerError> {
        let Some(sell) = event.as_trade().filter(|t| t.is_sell()) else {
            return Ok(None);
        };

        let mut amount_left = sell.trade.from.amount();
        let price = match sell.trade.crypto_price() {
            Ok(price) => price,
            Err(_) if amount_left.is_zero() => Decimal::ZERO,
            Err(e) => return Err(e),
        };
        self.ensure_lots_cover(amount_left)?;

        let proceeds_currency = sell.trade.to.currency();
        self.sales.push(SaleRecord {
            datetime: sell.datetime,
            quantity: amount_left,
            sell_price: price,
            proceeds_currency,
            matches: Vec::new(),
        });
        let index = self.sales.len() - 1;

        while amount_left > Decimal::ZERO {
            let draw = self
                .lots
                .draw(amount_left)
                .ok_or(LedgerError::InsufficientLots {
                    available: Decimal::ZERO,
                    required: amount_left,
                })?;
            amount_left = number(amount_left - draw.quantity);

            let gain = number(draw.quantity * (price - draw.buy_price));
            log::debug!(
                "MATCH: {} at {} against lot bought {} at {}: gain {}, lot left {}",
                draw.quantity,
                price,
                draw.trade.datetime,
                draw.buy_price,
                gain,
                draw.amount_left
            );

            self.sales[index].matches.push(LotMatch {
                quantity: draw.quantity,
                sell_price: Amount::new(price, proceeds_currency),
                lot_amount_left: draw.amount_left,
                buy_price: draw.buy_price,
                buy_trade: draw.trade,
                gain,
            });
        }

        Ok(self.sales.last())
    }

    /// Net realized gain across every sale so far. Negative for a net loss.
    pub fn total_taxes(&self) -> Decimal {
        self.sales.iter().map(SaleRecord::gain).sum()
    }

    /// Net realized gain across sales settled in `currency`.
    pub fn total_taxes_in(&self, currency: Currency) -> Amount {
        let total = self
            .sales
            .iter()
            .filter(|s| s.proceeds_currency == currency)
            .map(SaleRecord::gain)
            .sum();
        Amount::new(total, currency)
    }

    pub fn ensure_lots_cover(&self, quantity: Decimal) -> Result<(), LedgerError> {
        let available = self.lots.total_open();
        if available < quantity {
            return Err(LedgerError::InsufficientLots {
                available,
                required: quantity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::Trade;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn dt(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn buy(day: u32, eur: Decimal, ripple: Decimal) -> TradeEvent {
        TradeEvent {
            datetime: dt(day),
            trade: Trade::new(
                Amount::new(eur, Currency::Eur),
                Amount::new(ripple, Currency::Ripple),
                Decimal::ZERO,
            ),
        }
    }

    fn sell(day: u32, ripple: Decimal, fiat: Decimal, currency: Currency) -> TransactionEvent {
        TransactionEvent::trade(
            Trade::new(
                Amount::new(ripple, Currency::Ripple),
                Amount::new(fiat, currency),
                Decimal::ZERO,
            ),
            dt(day),
        )
    }

    fn engine_with_lots(lots: &[TradeEvent]) -> TaxEngine {
        let mut engine = TaxEngine::default();
        for lot in lots {
            engine.add_lot(lot).unwrap();
        }
        engine
    }

    #[test]
    fn no_sales_no_taxes() {
        let engine = engine_with_lots(&[buy(1, dec!(50), dec!(40))]);
        assert_eq!(engine.total_taxes(), Decimal::ZERO);
        assert!(engine.sales().is_empty());
    }

    #[test]
    fn non_sell_events_are_ignored() {
        let mut engine = engine_with_lots(&[buy(1, dec!(50), dec!(40))]);
        let deposit = TransactionEvent::deposit(Amount::new(dec!(10), Currency::Eur), dt(2));
        let another_buy = TransactionEvent::Trade(buy(3, dec!(10), dec!(5)));

        assert_eq!(engine.process_sale(&deposit), Ok(None));
        assert_eq!(engine.process_sale(&another_buy), Ok(None));
        assert!(engine.sales().is_empty());
        assert_eq!(engine.lots().len(), 1);
    }

    #[test]
    fn single_sale_within_first_lot() {
        let mut engine = engine_with_lots(&[buy(1, dec!(50), dec!(40))]);

        let record = engine
            .process_sale(&sell(2, dec!(30), dec!(45), Currency::Eur))
            .unwrap()
            .unwrap()
            .clone();

        // bought at 1.25, sold at 1.5
        assert_eq!(record.quantity, dec!(30));
        assert_eq!(record.sell_price, dec!(1.5));
        assert_eq!(record.matches.len(), 1);
        assert_eq!(record.matches[0].lot_amount_left, dec!(10));
        assert_eq!(record.matches[0].sell_price, Amount::new(dec!(1.5), Currency::Eur));
        assert_eq!(engine.total_taxes(), dec!(30) * dec!(0.25));
    }

    #[test]
    fn sale_smaller_than_first_lot_never_touches_second() {
        let first = buy(1, dec!(120), dec!(100));
        let second = buy(2, dec!(65), dec!(50));
        let mut engine = engine_with_lots(&[first.clone(), second]);

        engine
            .process_sale(&sell(3, dec!(100), dec!(150), Currency::Eur))
            .unwrap();

        let matches = &engine.sales()[0].matches;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].buy_trade, first);
        assert_eq!(engine.lots().len(), 1);
        assert_eq!(engine.lots().total_open(), dec!(50));
    }

    #[test]
    fn sale_spanning_lots_matches_weighted_average_cost() {
        let mut engine =
            engine_with_lots(&[buy(1, dec!(120), dec!(100)), buy(2, dec!(65), dec!(50))]);

        let record = engine
            .process_sale(&sell(3, dec!(125), dec!(187.5), Currency::Eur))
            .unwrap()
            .unwrap()
            .clone();

        assert_eq!(record.matches.len(), 2);
        assert_eq!(record.matches[0].quantity, dec!(100));
        assert!(record.matches[0].lot_amount_left.is_zero());
        assert_eq!(record.matches[1].quantity, dec!(25));
        assert_eq!(record.matches[1].lot_amount_left, dec!(25));

        // cost of consumed lots: 100 * 1.2 + 25 * 1.3 = 152.5
        let average_buy = dec!(152.5) / dec!(125);
        let expected = dec!(125) * (dec!(1.5) - average_buy);
        assert!((record.gain() - expected).abs() <= dec!(0.00001));
    }

    #[test]
    fn sale_below_cost_is_a_loss() {
        let mut engine = engine_with_lots(&[buy(1, dec!(120), dec!(100))]);
        engine
            .process_sale(&sell(2, dec!(50), dec!(50), Currency::Eur))
            .unwrap();
        assert_eq!(engine.total_taxes(), dec!(-10));
    }

    #[test]
    fn oversell_fails_without_consuming_lots() {
        let mut engine = engine_with_lots(&[buy(1, dec!(120), dec!(100))]);

        let err = engine
            .process_sale(&sell(2, dec!(100.00001), dec!(150), Currency::Eur))
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientLots {
                available: dec!(100),
                required: dec!(100.00001),
            }
        );
        assert!(engine.sales().is_empty());
        assert_eq!(engine.lots().total_open(), dec!(100));
    }

    #[test]
    fn zero_quantity_sale_is_recorded_without_matches() {
        let mut engine = engine_with_lots(&[buy(1, dec!(120), dec!(100))]);

        let record = engine
            .process_sale(&sell(2, dec!(0), dec!(0), Currency::Eur))
            .unwrap()
            .unwrap()
            .clone();

        assert!(record.matches.is_empty());
        assert_eq!(record.quantity, Decimal::ZERO);
        assert_eq!(engine.sales().len(), 1);
        assert_eq!(engine.lots().total_open(), dec!(100));
        assert_eq!(engine.total_taxes(), Decimal::ZERO);
    }

    #[test]
    fn totals_by_proceeds_currency() {
        let mut engine = engine_with_lots(&[buy(1, dec!(100), dec!(100))]);
        engine
            .process_sale(&sell(2, dec!(10), dec!(20), Currency::Eur))
            .unwrap();
        engine
            .process_sale(&sell(3, dec!(10), dec!(30), Currency::Nok))
            .unwrap();

        assert_eq!(engine.total_taxes_in(Currency::Eur).amount(), dec!(10));
        assert_eq!(engine.total_taxes_in(Currency::Nok).amount(), dec!(20));
        assert_eq!(engine.total_taxes(), dec!(30));
    }

    #[test]
    fn unpriceable_lot_is_rejected_before_any_sale() {
        let mut engine = TaxEngine::default();

        let err = engine.add_lot(&buy(1, dec!(0), dec!(0))).unwrap_err();
        assert!(matches!(err, LedgerError::ZeroAmountTrade { .. }));
        engine.add_lot(&buy(2, dec!(10), dec!(10))).unwrap();

        let record = engine
            .process_sale(&sell(3, dec!(5), dec!(10), Currency::Eur))
            .unwrap()
            .unwrap()
            .clone();

        assert_eq!(record.matches.len(), 1);
        assert_eq!(record.matches[0].buy_price, dec!(1));
        assert_eq!(record.gain(), dec!(5));
        assert_eq!(engine.sales().len(), 1);
        assert_eq!(engine.lots().total_open(), dec!(5));
    }
}
