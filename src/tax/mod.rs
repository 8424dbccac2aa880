pub mod bracket;
pub mod fifo;
pub mod lots;

#[allow(unused_imports)]
pub use bracket::{Bracket, BracketTable};
#[allow(unused_imports)]
pub use fifo::{LotMatch, SaleRecord, TaxEngine};
#[allow(unused_imports)]
pub use lots::{LotQueue, OpenLot};
