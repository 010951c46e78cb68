use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use warung_events::{EventEnvelope, Projection};
use warung_menu::{AGGREGATE_TYPE, MenuCategory, MenuEvent, MenuItemDetails, MenuItemId};

use crate::projections::cursor::{CursorCheck, ProjectionError, StreamCursors};
use crate::read_model::ReadStore;

/// Queryable menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemReadModel {
    pub id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub price: u64,
    pub description: String,
    pub stock: u32,
    pub available: bool,
    pub updated_at: DateTime<Utc>,
}

impl MenuItemReadModel {
    fn with_details(mut self, details: MenuItemDetails, at: DateTime<Utc>) -> Self {
        self.name = details.name;
        self.category = details.category;
        self.price = details.price;
        self.description = details.description;
        self.stock = details.stock;
        self.updated_at = at;
        self
    }
}

/// Case-insensitive name search plus optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    pub search: Option<String>,
    pub category: Option<MenuCategory>,
}

impl MenuFilter {
    fn matches(&self, item: &MenuItemReadModel) -> bool {
        let name_ok = match &self.search {
            Some(q) if !q.trim().is_empty() => {
                item.name.to_lowercase().contains(&q.trim().to_lowercase())
            }
            _ => true,
        };
        name_ok && self.category.is_none_or(|c| c == item.category)
    }
}

#[derive(Debug)]
pub struct MenuCatalogProjection<S>
where
    S: ReadStore<MenuItemId, MenuItemReadModel>,
{
    store: S,
    cursors: StreamCursors,
}

impl<S> MenuCatalogProjection<S>
where
    S: ReadStore<MenuItemId, MenuItemReadModel>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            cursors: StreamCursors::new(),
        }
    }

    pub fn get(&self, item_id: &MenuItemId) -> Option<MenuItemReadModel> {
        self.store.get(item_id)
    }

    /// Filtered list, sorted by name.
    pub fn list(&self, filter: &MenuFilter) -> Vec<MenuItemReadModel> {
        let mut items: Vec<_> = self
            .store
            .list()
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect();
        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        items
    }
}

impl<S> Projection for MenuCatalogProjection<S>
where
    S: ReadStore<MenuItemId, MenuItemReadModel>,
{
    type Error = ProjectionError;

    fn name(&self) -> &'static str {
        "menu.catalog"
    }

    fn apply_envelope(&self, envelope: &EventEnvelope<JsonValue>) -> Result<(), ProjectionError> {
        if envelope.aggregate_type() != AGGREGATE_TYPE {
            return Ok(());
        }

        let aggregate_id = envelope.aggregate_id();
        let seq = envelope.sequence_number();
        if self.cursors.check(aggregate_id, seq)? == CursorCheck::Duplicate {
            return Ok(());
        }

        let ev: MenuEvent = serde_json::from_value(envelope.payload().clone()).map_err(|e| {
            ProjectionError::Deserialize {
                aggregate_type: AGGREGATE_TYPE,
                message: e.to_string(),
            }
        })?;
        let item_id = ev.item_id();
        if item_id.0 != aggregate_id {
            return Err(ProjectionError::StreamMismatch(item_id.to_string()));
        }

        match ev {
            MenuEvent::MenuItemAdded(e) => {
                let blank = MenuItemReadModel {
                    id: e.item_id,
                    name: String::new(),
                    category: e.details.category,
                    price: 0,
                    description: String::new(),
                    stock: 0,
                    available: true,
                    updated_at: e.occurred_at,
                };
                self.store
                    .upsert(e.item_id, blank.with_details(e.details, e.occurred_at));
            }
            MenuEvent::MenuItemUpdated(e) => {
                if let Some(rm) = self.store.get(&e.item_id) {
                    self.store
                        .upsert(e.item_id, rm.with_details(e.details, e.occurred_at));
                }
            }
            MenuEvent::AvailabilityChanged(e) => {
                if let Some(mut rm) = self.store.get(&e.item_id) {
                    rm.available = e.available;
                    rm.updated_at = e.occurred_at;
                    self.store.upsert(e.item_id, rm);
                }
            }
            MenuEvent::MenuItemRemoved(e) => {
                self.store.remove(&e.item_id);
            }
        }

        self.cursors.advance(aggregate_id, seq);
        Ok(())
    }

    fn reset(&self) {
        self.store.clear();
        self.cursors.clear();
    }
}
