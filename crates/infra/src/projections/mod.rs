//! Projection implementations (read model builders).
//!
//! Every projection is rebuildable from the event log and idempotent: an
//! envelope applied twice leaves the read model as if it were applied once.

pub mod cursor;
pub mod menu;
pub mod orders;
pub mod stock;

pub use cursor::{CursorCheck, ProjectionError, StreamCursors};
pub use menu::{MenuCatalogProjection, MenuFilter, MenuItemReadModel};
pub use orders::{OrderReadModel, OrdersProjection};
pub use stock::{StockFilter, StockItemReadModel, StockLedgerProjection};
