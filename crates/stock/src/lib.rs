//! Stock ledger domain module (event-sourced).
//!
//! Ingredients, beverages and packaging with restock/consume deltas. The
//! low-stock status is derived from the current snapshot on every read and is
//! never stored.

pub mod item;
pub mod level;

pub use item::{
    AGGREGATE_TYPE, Consume, RegisterStockItem, RemoveStockItem, Restock, StockCategory,
    StockCommand, StockConsumed, StockEvent, StockItem, StockItemDetails, StockItemId,
    StockItemRegistered, StockItemRemoved, StockItemUpdated, StockRestocked, UpdateStockItem,
};
pub use level::{DEFAULT_LOW_STOCK_MULTIPLIER, StockLevel, stock_level};
