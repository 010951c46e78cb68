use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use warung_core::{Aggregate, AggregateRoot, DomainError, typed_id};
use warung_events::Event;

use crate::level::{DEFAULT_LOW_STOCK_MULTIPLIER, StockLevel, stock_level};

/// Stream family name used by the event store and projections.
pub const AGGREGATE_TYPE: &str = "stock.item";

typed_id!(
    /// Stock item identifier.
    StockItemId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockCategory {
    Ingredient,
    Beverage,
    Packaging,
}

impl StockCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockCategory::Ingredient => "ingredient",
            StockCategory::Beverage => "beverage",
            StockCategory::Packaging => "packaging",
        }
    }
}

impl core::str::FromStr for StockCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ingredient" => Ok(StockCategory::Ingredient),
            "beverage" => Ok(StockCategory::Beverage),
            "packaging" => Ok(StockCategory::Packaging),
            other => Err(DomainError::validation(format!(
                "unknown stock category '{other}' (expected ingredient, beverage or packaging)"
            ))),
        }
    }
}

/// Fields set by the register/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemDetails {
    pub name: String,
    pub category: StockCategory,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    /// Unit label ("kg", "pcs", "kotak").
    pub unit: String,
    /// Cost per unit in whole currency units.
    pub cost: u64,
    pub supplier: String,
}

impl StockItemDetails {
    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        if self.current_stock < Decimal::ZERO {
            return Err(DomainError::validation("current_stock cannot be negative"));
        }
        if self.min_stock < Decimal::ZERO {
            return Err(DomainError::validation("min_stock cannot be negative"));
        }
        Ok(())
    }
}

/// Aggregate root: StockItem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockItem {
    id: StockItemId,
    details: Option<StockItemDetails>,
    last_updated: Option<DateTime<Utc>>,
    removed: bool,
    version: u64,
}

impl StockItem {
    /// Create an empty, not-yet-registered aggregate instance for rehydration.
    pub fn empty(id: StockItemId) -> Self {
        Self {
            id,
            details: None,
            last_updated: None,
            removed: false,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> StockItemId {
        self.id
    }

    pub fn details(&self) -> Option<&StockItemDetails> {
        self.details.as_ref()
    }

    pub fn current_stock(&self) -> Decimal {
        self.details
            .as_ref()
            .map(|d| d.current_stock)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Status with the default 1.5× low-stock multiplier.
    pub fn status(&self) -> Option<StockLevel> {
        self.status_with(DEFAULT_LOW_STOCK_MULTIPLIER)
    }

    pub fn status_with(&self, low_multiplier: Decimal) -> Option<StockLevel> {
        self.details
            .as_ref()
            .map(|d| stock_level(d.current_stock, d.min_stock, low_multiplier))
    }

    fn exists(&self) -> bool {
        self.details.is_some() && !self.removed
    }
}

impl AggregateRoot for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterStockItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterStockItem {
    pub item_id: StockItemId,
    pub details: StockItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateStockItem (edit form; replaces every field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStockItem {
    pub item_id: StockItemId,
    pub details: StockItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Restock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restock {
    pub item_id: StockItemId,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consume {
    pub item_id: StockItemId,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveStockItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveStockItem {
    pub item_id: StockItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    RegisterStockItem(RegisterStockItem),
    UpdateStockItem(UpdateStockItem),
    Restock(Restock),
    Consume(Consume),
    RemoveStockItem(RemoveStockItem),
}

/// Event: StockItemRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemRegistered {
    pub item_id: StockItemId,
    pub details: StockItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockItemUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemUpdated {
    pub item_id: StockItemId,
    pub details: StockItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockRestocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRestocked {
    pub item_id: StockItemId,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockConsumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockConsumed {
    pub item_id: StockItemId,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemRemoved {
    pub item_id: StockItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEvent {
    StockItemRegistered(StockItemRegistered),
    StockItemUpdated(StockItemUpdated),
    StockRestocked(StockRestocked),
    StockConsumed(StockConsumed),
    StockItemRemoved(StockItemRemoved),
}

impl StockEvent {
    pub fn item_id(&self) -> StockItemId {
        match self {
            StockEvent::StockItemRegistered(e) => e.item_id,
            StockEvent::StockItemUpdated(e) => e.item_id,
            StockEvent::StockRestocked(e) => e.item_id,
            StockEvent::StockConsumed(e) => e.item_id,
            StockEvent::StockItemRemoved(e) => e.item_id,
        }
    }
}

impl Event for StockEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StockEvent::StockItemRegistered(_) => "stock.item.registered",
            StockEvent::StockItemUpdated(_) => "stock.item.updated",
            StockEvent::StockRestocked(_) => "stock.item.restocked",
            StockEvent::StockConsumed(_) => "stock.item.consumed",
            StockEvent::StockItemRemoved(_) => "stock.item.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockEvent::StockItemRegistered(e) => e.occurred_at,
            StockEvent::StockItemUpdated(e) => e.occurred_at,
            StockEvent::StockRestocked(e) => e.occurred_at,
            StockEvent::StockConsumed(e) => e.occurred_at,
            StockEvent::StockItemRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockItem {
    type Command = StockCommand;
    type Event = StockEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockEvent::StockItemRegistered(e) => {
                self.id = e.item_id;
                self.details = Some(e.details.clone());
                self.removed = false;
            }
            StockEvent::StockItemUpdated(e) => {
                self.details = Some(e.details.clone());
            }
            StockEvent::StockRestocked(e) => {
                if let Some(d) = self.details.as_mut() {
                    d.current_stock = d.current_stock.saturating_add(e.amount);
                }
            }
            StockEvent::StockConsumed(e) => {
                if let Some(d) = self.details.as_mut() {
                    d.current_stock = d.current_stock.saturating_sub(e.amount);
                }
            }
            StockEvent::StockItemRemoved(_) => {
                self.removed = true;
            }
        }

        self.last_updated = Some(event.occurred_at());
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::RegisterStockItem(cmd) => self.handle_register(cmd),
            StockCommand::UpdateStockItem(cmd) => self.handle_update(cmd),
            StockCommand::Restock(cmd) => self.handle_restock(cmd),
            StockCommand::Consume(cmd) => self.handle_consume(cmd),
            StockCommand::RemoveStockItem(cmd) => self.handle_remove(cmd),
        }
    }
}

impl StockItem {
    fn ensure_exists(&self, item_id: StockItemId) -> Result<(), DomainError> {
        if !self.exists() {
            return Err(DomainError::not_found());
        }
        if self.id != item_id {
            return Err(DomainError::validation("item_id mismatch"));
        }
        Ok(())
    }

    fn handle_register(&self, cmd: &RegisterStockItem) -> Result<Vec<StockEvent>, DomainError> {
        if self.details.is_some() {
            return Err(DomainError::conflict("stock item already exists"));
        }
        cmd.details.validate()?;

        Ok(vec![StockEvent::StockItemRegistered(StockItemRegistered {
            item_id: cmd.item_id,
            details: cmd.details.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateStockItem) -> Result<Vec<StockEvent>, DomainError> {
        self.ensure_exists(cmd.item_id)?;
        cmd.details.validate()?;

        Ok(vec![StockEvent::StockItemUpdated(StockItemUpdated {
            item_id: cmd.item_id,
            details: cmd.details.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_restock(&self, cmd: &Restock) -> Result<Vec<StockEvent>, DomainError> {
        self.ensure_exists(cmd.item_id)?;

        if cmd.amount <= Decimal::ZERO {
            return Err(DomainError::validation("restock amount must be positive"));
        }
        if self.current_stock().checked_add(cmd.amount).is_none() {
            return Err(DomainError::validation(format!(
                "restock of {} would exceed the maximum stock level",
                cmd.amount
            )));
        }

        Ok(vec![StockEvent::StockRestocked(StockRestocked {
            item_id: cmd.item_id,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_consume(&self, cmd: &Consume) -> Result<Vec<StockEvent>, DomainError> {
        self.ensure_exists(cmd.item_id)?;

        if cmd.amount <= Decimal::ZERO {
            return Err(DomainError::validation("consume amount must be positive"));
        }

        let available = self.current_stock();
        if cmd.amount > available {
            return Err(DomainError::insufficient_stock(format!(
                "requested {}, available {}",
                cmd.amount, available
            )));
        }

        Ok(vec![StockEvent::StockConsumed(StockConsumed {
            item_id: cmd.item_id,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveStockItem) -> Result<Vec<StockEvent>, DomainError> {
        self.ensure_exists(cmd.item_id)?;

        Ok(vec![StockEvent::StockItemRemoved(StockItemRemoved {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
