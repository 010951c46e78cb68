use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warung_core::{Aggregate, AggregateRoot, DomainError, typed_id};
use warung_events::Event;

/// Stream family name used by the event store and projections.
pub const AGGREGATE_TYPE: &str = "menu.item";

typed_id!(
    /// Menu item identifier.
    MenuItemId
);

/// Fixed menu category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    Main,
    Appetizer,
    Drink,
}

impl MenuCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Main => "main",
            MenuCategory::Appetizer => "appetizer",
            MenuCategory::Drink => "drink",
        }
    }
}

impl core::str::FromStr for MenuCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "main" => Ok(MenuCategory::Main),
            "appetizer" => Ok(MenuCategory::Appetizer),
            "drink" => Ok(MenuCategory::Drink),
            other => Err(DomainError::validation(format!(
                "unknown menu category '{other}' (expected main, appetizer or drink)"
            ))),
        }
    }
}

/// Editable fields of a menu item (what the admin form submits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDetails {
    pub name: String,
    pub category: MenuCategory,
    /// Price in whole currency units (no minor unit).
    pub price: u64,
    pub description: String,
    pub stock: u32,
}

impl MenuItemDetails {
    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(())
    }
}

/// Aggregate root: MenuItem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    id: MenuItemId,
    details: Option<MenuItemDetails>,
    available: bool,
    removed: bool,
    version: u64,
}

impl MenuItem {
    /// Create an empty, not-yet-added aggregate instance for rehydration.
    pub fn empty(id: MenuItemId) -> Self {
        Self {
            id,
            details: None,
            available: false,
            removed: false,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> MenuItemId {
        self.id
    }

    pub fn details(&self) -> Option<&MenuItemDetails> {
        self.details.as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    fn exists(&self) -> bool {
        self.details.is_some() && !self.removed
    }
}

impl AggregateRoot for MenuItem {
    type Id = MenuItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddMenuItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMenuItem {
    pub item_id: MenuItemId,
    pub details: MenuItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateMenuItem (replaces all editable fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMenuItem {
    pub item_id: MenuItemId,
    pub details: MenuItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetAvailability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAvailability {
    pub item_id: MenuItemId,
    pub available: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveMenuItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveMenuItem {
    pub item_id: MenuItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCommand {
    AddMenuItem(AddMenuItem),
    UpdateMenuItem(UpdateMenuItem),
    SetAvailability(SetAvailability),
    RemoveMenuItem(RemoveMenuItem),
}

/// Event: MenuItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemAdded {
    pub item_id: MenuItemId,
    pub details: MenuItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MenuItemUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemUpdated {
    pub item_id: MenuItemId,
    pub details: MenuItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AvailabilityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityChanged {
    pub item_id: MenuItemId,
    pub available: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MenuItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemRemoved {
    pub item_id: MenuItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuEvent {
    MenuItemAdded(MenuItemAdded),
    MenuItemUpdated(MenuItemUpdated),
    AvailabilityChanged(AvailabilityChanged),
    MenuItemRemoved(MenuItemRemoved),
}

impl MenuEvent {
    pub fn item_id(&self) -> MenuItemId {
        match self {
            MenuEvent::MenuItemAdded(e) => e.item_id,
            MenuEvent::MenuItemUpdated(e) => e.item_id,
            MenuEvent::AvailabilityChanged(e) => e.item_id,
            MenuEvent::MenuItemRemoved(e) => e.item_id,
        }
    }
}

impl Event for MenuEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MenuEvent::MenuItemAdded(_) => "menu.item.added",
            MenuEvent::MenuItemUpdated(_) => "menu.item.updated",
            MenuEvent::AvailabilityChanged(_) => "menu.item.availability_changed",
            MenuEvent::MenuItemRemoved(_) => "menu.item.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MenuEvent::MenuItemAdded(e) => e.occurred_at,
            MenuEvent::MenuItemUpdated(e) => e.occurred_at,
            MenuEvent::AvailabilityChanged(e) => e.occurred_at,
            MenuEvent::MenuItemRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for MenuItem {
    type Command = MenuCommand;
    type Event = MenuEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            MenuEvent::MenuItemAdded(e) => {
                self.id = e.item_id;
                self.details = Some(e.details.clone());
                self.available = true;
                self.removed = false;
            }
            MenuEvent::MenuItemUpdated(e) => {
                self.details = Some(e.details.clone());
            }
            MenuEvent::AvailabilityChanged(e) => {
                self.available = e.available;
            }
            MenuEvent::MenuItemRemoved(_) => {
                self.removed = true;
                self.available = false;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            MenuCommand::AddMenuItem(cmd) => self.handle_add(cmd),
            MenuCommand::UpdateMenuItem(cmd) => self.handle_update(cmd),
            MenuCommand::SetAvailability(cmd) => self.handle_set_availability(cmd),
            MenuCommand::RemoveMenuItem(cmd) => self.handle_remove(cmd),
        }
    }
}

impl MenuItem {
    fn ensure_item_id(&self, item_id: MenuItemId) -> Result<(), DomainError> {
        if self.id != item_id {
            return Err(DomainError::validation("item_id mismatch"));
        }
        Ok(())
    }

    fn ensure_exists(&self, item_id: MenuItemId) -> Result<(), DomainError> {
        if !self.exists() {
            return Err(DomainError::not_found());
        }
        self.ensure_item_id(item_id)
    }

    fn handle_add(&self, cmd: &AddMenuItem) -> Result<Vec<MenuEvent>, DomainError> {
        if self.details.is_some() {
            return Err(DomainError::conflict("menu item already exists"));
        }
        cmd.details.validate()?;

        Ok(vec![MenuEvent::MenuItemAdded(MenuItemAdded {
            item_id: cmd.item_id,
            details: cmd.details.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateMenuItem) -> Result<Vec<MenuEvent>, DomainError> {
        self.ensure_exists(cmd.item_id)?;
        cmd.details.validate()?;

        Ok(vec![MenuEvent::MenuItemUpdated(MenuItemUpdated {
            item_id: cmd.item_id,
            details: cmd.details.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_availability(
        &self,
        cmd: &SetAvailability,
    ) -> Result<Vec<MenuEvent>, DomainError> {
        self.ensure_exists(cmd.item_id)?;

        Ok(vec![MenuEvent::AvailabilityChanged(AvailabilityChanged {
            item_id: cmd.item_id,
            available: cmd.available,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveMenuItem) -> Result<Vec<MenuEvent>, DomainError> {
        self.ensure_exists(cmd.item_id)?;

        Ok(vec![MenuEvent::MenuItemRemoved(MenuItemRemoved {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
