use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use warung_events::{EventEnvelope, Projection};
use warung_stock::{
    AGGREGATE_TYPE, StockCategory, StockEvent, StockItemDetails, StockItemId, StockLevel,
    stock_level,
};

use crate::projections::cursor::{CursorCheck, ProjectionError, StreamCursors};
use crate::read_model::ReadStore;

/// Queryable stock item. The level is not stored; see [`StockItemReadModel::level`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemReadModel {
    pub id: StockItemId,
    pub name: String,
    pub category: StockCategory,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub unit: String,
    pub cost: u64,
    pub supplier: String,
    pub last_updated: DateTime<Utc>,
}

impl StockItemReadModel {
    fn from_details(id: StockItemId, details: StockItemDetails, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: details.name,
            category: details.category,
            current_stock: details.current_stock,
            min_stock: details.min_stock,
            unit: details.unit,
            cost: details.cost,
            supplier: details.supplier,
            last_updated: at,
        }
    }

    pub fn level(&self, low_multiplier: Decimal) -> StockLevel {
        stock_level(self.current_stock, self.min_stock, low_multiplier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockFilter {
    pub search: Option<String>,
    pub category: Option<StockCategory>,
}

impl StockFilter {
    fn matches(&self, item: &StockItemReadModel) -> bool {
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
pub struct StockLedgerProjection<S>
where
    S: ReadStore<StockItemId, StockItemReadModel>,
{
    store: S,
    cursors: StreamCursors,
}

impl<S> StockLedgerProjection<S>
where
    S: ReadStore<StockItemId, StockItemReadModel>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            cursors: StreamCursors::new(),
        }
    }

    pub fn get(&self, item_id: &StockItemId) -> Option<StockItemReadModel> {
        self.store.get(item_id)
    }

    /// Filtered list, sorted by name.
    pub fn list(&self, filter: &StockFilter) -> Vec<StockItemReadModel> {
        let mut items: Vec<_> = self
            .store
            .list()
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect();
        items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        items
    }

    /// Items at critical level, most depleted (relative to minimum) first.
    pub fn critical(&self, low_multiplier: Decimal) -> Vec<StockItemReadModel> {
        let mut items: Vec<_> = self
            .store
            .list()
            .into_iter()
            .filter(|i| i.level(low_multiplier) == StockLevel::Critical)
            .collect();
        items.sort_by(|a, b| {
            (a.current_stock - a.min_stock)
                .cmp(&(b.current_stock - b.min_stock))
                .then_with(|| a.name.cmp(&b.name))
        });
        items
    }
}

impl<S> Projection for StockLedgerProjection<S>
where
    S: ReadStore<StockItemId, StockItemReadModel>,
{
    type Error = ProjectionError;

    fn name(&self) -> &'static str {
        "stock.ledger"
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

        let ev: StockEvent = serde_json::from_value(envelope.payload().clone()).map_err(|e| {
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
            StockEvent::StockItemRegistered(e) => {
                self.store.upsert(
                    e.item_id,
                    StockItemReadModel::from_details(e.item_id, e.details, e.occurred_at),
                );
            }
            StockEvent::StockItemUpdated(e) => {
                self.store.upsert(
                    e.item_id,
                    StockItemReadModel::from_details(e.item_id, e.details, e.occurred_at),
                );
            }
            StockEvent::StockRestocked(e) => {
                if let Some(mut rm) = self.store.get(&e.item_id) {
                    rm.current_stock = rm.current_stock.saturating_add(e.amount);
                    rm.last_updated = e.occurred_at;
                    self.store.upsert(e.item_id, rm);
                }
            }
            StockEvent::StockConsumed(e) => {
                if let Some(mut rm) = self.store.get(&e.item_id) {
                    rm.current_stock = rm.current_stock.saturating_sub(e.amount);
                    rm.last_updated = e.occurred_at;
                    self.store.upsert(e.item_id, rm);
                }
            }
            StockEvent::StockItemRemoved(e) => {
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
