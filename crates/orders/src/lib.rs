//! Order engine domain module (event-sourced).
//!
//! Orders are placed with lines snapshotted from the menu, move through the
//! kitchen status machine, and are closed by payment or cancellation.

pub mod order;
pub mod status;

pub use order::{
    AGGREGATE_TYPE, AdvanceStatus, ApplyPayment, NewOrderLine, Order, OrderCommand, OrderEvent,
    OrderId, OrderLine, OrderPlaced, PaymentApplied, PlaceOrder, StatusChanged,
    format_order_number,
};
pub use status::{OrderStatus, PaymentMethod, PaymentStatus};
