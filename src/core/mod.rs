pub mod balance;
pub mod error;
pub mod events;
pub mod money;
pub mod rates;

// Flat public surface for domain types.
#[allow(unused_imports)]
pub use balance::BalanceSheet;
#[allow(unused_imports)]
pub use error::LedgerError;
#[allow(unused_imports)]
pub use events::{Deposit, LedgerInput, Trade, TradeEvent, TransactionEvent};
#[allow(unused_imports)]
pub use money::{number, Amount, Currency, SCALE};
#[allow(unused_imports)]
pub use rates::{CurrencyPair, RateError, RateObservation, RateTable};
