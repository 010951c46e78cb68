//! Menu catalog domain module (event-sourced).
//!
//! Sellable items with price, category and availability. The order engine
//! reads this catalog when an order is placed and snapshots what it needs.

pub mod item;

pub use item::{
    AGGREGATE_TYPE, AddMenuItem, AvailabilityChanged, MenuCategory, MenuCommand, MenuEvent,
    MenuItem, MenuItemAdded, MenuItemDetails, MenuItemId, MenuItemRemoved, MenuItemUpdated,
    RemoveMenuItem, SetAvailability, UpdateMenuItem,
};
