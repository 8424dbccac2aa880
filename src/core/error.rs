use super::money::{Amount, Currency};
use rust_decimal::Decimal;

/// Reasons a transaction can be rejected by the ledger.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient {currency} balance: available {available}, required {required}")]
    InsufficientBalance {
        currency: Currency,
        available: Decimal,
        required: Decimal,
    },
    #[error("sell of {required} exceeds open buy lots of {available}")]
    InsufficientLots {
        available: Decimal,
        required: Decimal,
    },
    #[error("trade {from} -> {to} must have exactly one crypto side")]
    UnsupportedTrade { from: Currency, to: Currency },
    #[error("cannot price a trade with a zero amount: {from} -> {to}")]
    ZeroAmountTrade { from: Amount, to: Amount },
}
