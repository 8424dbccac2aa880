use super::error::LedgerError;
use super::money::{Amount, Currency};
use std::collections::BTreeMap;

/// Running balance per currency for a single holder.
#[derive(Debug, Clone, Default)]
pub struct BalanceSheet {
    balances: BTreeMap<Currency, Amount>,
}

impl BalanceSheet {
    /// Balance entry for `currency`, inserting a zero balance on first access.
    pub fn get_or_create(&mut self, currency: Currency) -> &mut Amount {
        self.balances
            .entry(currency)
            .or_insert_with(|| Amount::zero(currency))
    }

    /// Current balance without creating an entry.
    pub fn balance(&self, currency: Currency) -> Amount {
        self.balances
            .get(&currency)
            .copied()
            .unwrap_or_else(|| Amount::zero(currency))
    }

    pub fn credit(&mut self, amount: &Amount) {
        let balance = self.get_or_create(amount.currency());
        *balance = balance.plus(amount.amount());
        log::debug!("CREDIT {} -> balance {}", amount, balance);
    }

    /// Fails without touching the balance when it does not cover `amount`.
    pub fn debit(&mut self, amount: &Amount) -> Result<(), LedgerError> {
        self.ensure_covers(amount)?;
        let balance = self.get_or_create(amount.currency());
        *balance = balance.plus(-amount.amount());
        log::debug!("DEBIT {} -> balance {}", amount, balance);
        Ok(())
    }

    pub fn ensure_covers(&self, amount: &Amount) -> Result<(), LedgerError> {
        let available = self.balance(amount.currency()).amount();
        if available < amount.amount() {
            return Err(LedgerError::InsufficientBalance {
                currency: amount.currency(),
                available,
                required: amount.amount(),
            });
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Amount> {
        self.balances.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn get_or_create_inserts_zero_balance() {
        let mut sheet = BalanceSheet::default();
        assert_eq!(sheet.iter().count(), 0);
        assert!(sheet.get_or_create(Currency::Nok).is_zero());
        assert_eq!(sheet.iter().count(), 1);
    }

    #[test]
    fn balance_query_does_not_insert() {
        let sheet = BalanceSheet::default();
        assert!(sheet.balance(Currency::Eur).is_zero());
        assert_eq!(sheet.iter().count(), 0);
    }

    #[test]
    fn credits_accumulate() {
        let mut sheet = BalanceSheet::default();
        sheet.credit(&Amount::new(dec!(1000.00), Currency::Eur));
        sheet.credit(&Amount::new(dec!(200.00), Currency::Eur));
        assert_eq!(sheet.balance(Currency::Eur).amount(), dec!(1200));
    }

    #[test]
    fn debit_beyond_balance_leaves_sheet_unchanged() {
        let mut sheet = BalanceSheet::default();
        sheet.credit(&Amount::new(dec!(50), Currency::Eur));

        let err = sheet
            .debit(&Amount::new(dec!(50.00001), Currency::Eur))
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                currency: Currency::Eur,
                available: dec!(50),
                required: dec!(50.00001),
            }
        );
        assert_eq!(sheet.balance(Currency::Eur).amount(), dec!(50));
    }

    #[test]
    fn debit_of_entire_balance_reaches_exact_zero() {
        let mut sheet = BalanceSheet::default();
        sheet.credit(&Amount::new(dec!(66.56), Currency::Ripple));
        sheet
            .debit(&Amount::new(dec!(66.56), Currency::Ripple))
            .unwrap();
        assert!(sheet.balance(Currency::Ripple).is_zero());
    }
}
