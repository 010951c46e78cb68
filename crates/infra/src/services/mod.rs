//! Application services over the event store and read models.

pub mod demo;
pub mod ledger;

pub use demo::seed_demo;
pub use ledger::{EnvelopeBus, Ledger, LedgerError, OrderRequestLine, StockItemView};
