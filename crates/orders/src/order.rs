use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warung_core::{Aggregate, AggregateRoot, DomainError, ValueObject, typed_id};
use warung_events::Event;
use warung_menu::{MenuCategory, MenuItemId};

use crate::status::{OrderStatus, PaymentMethod, PaymentStatus};

/// Stream family name used by the event store and projections.
pub const AGGREGATE_TYPE: &str = "orders.order";

typed_id!(
    /// Order identifier.
    OrderId
);

/// Human-readable order number: `ORD001`, `ORD002`, ...
pub fn format_order_number(seq: u64) -> String {
    format!("ORD{seq:03}")
}

/// Line as submitted when placing an order, already resolved against the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub unit_price: u64,
    pub quantity: u32,
}

/// Immutable snapshot of a menu item inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_no: u32,
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub category: MenuCategory,
    pub unit_price: u64,
    pub quantity: u32,
}

impl OrderLine {
    pub fn subtotal(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

impl ValueObject for OrderLine {}

/// Aggregate root: Order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    order_no: String,
    customer_name: String,
    table_number: String,
    lines: Vec<OrderLine>,
    total: u64,
    status: OrderStatus,
    payment_status: PaymentStatus,
    payment_method: Option<PaymentMethod>,
    created_at: Option<DateTime<Utc>>,
    paid_at: Option<DateTime<Utc>>,
    placed: bool,
    version: u64,
}

impl Order {
    /// Create an empty, not-yet-placed aggregate instance for rehydration.
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            order_no: String::new(),
            customer_name: String::new(),
            table_number: String::new(),
            lines: Vec::new(),
            total: 0,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            created_at: None,
            paid_at: None,
            placed: false,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn order_no(&self) -> &str {
        &self.order_no
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn table_number(&self) -> &str {
        &self.table_number
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub order_no: String,
    pub customer_name: String,
    pub table_number: String,
    pub lines: Vec<NewOrderLine>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdvanceStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceStatus {
    pub order_id: OrderId,
    pub target: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApplyPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyPayment {
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    AdvanceStatus(AdvanceStatus),
    ApplyPayment(ApplyPayment),
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub order_no: String,
    pub customer_name: String,
    pub table_number: String,
    pub lines: Vec<OrderLine>,
    pub total: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentApplied.
///
/// Marks the order paid and served in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentApplied {
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub amount: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderPlaced(OrderPlaced),
    StatusChanged(StatusChanged),
    PaymentApplied(PaymentApplied),
}

impl OrderEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderPlaced(e) => e.order_id,
            OrderEvent::StatusChanged(e) => e.order_id,
            OrderEvent::PaymentApplied(e) => e.order_id,
        }
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "orders.order.placed",
            OrderEvent::StatusChanged(_) => "orders.order.status_changed",
            OrderEvent::PaymentApplied(_) => "orders.order.payment_applied",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderPlaced(e) => e.occurred_at,
            OrderEvent::StatusChanged(e) => e.occurred_at,
            OrderEvent::PaymentApplied(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(e) => {
                self.id = e.order_id;
                self.order_no = e.order_no.clone();
                self.customer_name = e.customer_name.clone();
                self.table_number = e.table_number.clone();
                self.lines = e.lines.clone();
                self.total = e.total;
                self.status = OrderStatus::Pending;
                self.payment_status = PaymentStatus::Unpaid;
                self.created_at = Some(e.occurred_at);
                self.placed = true;
            }
            OrderEvent::StatusChanged(e) => {
                self.status = e.to;
            }
            OrderEvent::PaymentApplied(e) => {
                self.payment_method = Some(e.method);
                self.payment_status = PaymentStatus::Paid;
                self.status = OrderStatus::Served;
                self.paid_at = Some(e.occurred_at);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::PlaceOrder(cmd) => self.handle_place(cmd),
            OrderCommand::AdvanceStatus(cmd) => self.handle_advance(cmd),
            OrderCommand::ApplyPayment(cmd) => self.handle_payment(cmd),
        }
    }
}

impl Order {
    fn ensure_placed(&self, order_id: OrderId) -> Result<(), DomainError> {
        if !self.placed {
            return Err(DomainError::not_found());
        }
        if self.id != order_id {
            return Err(DomainError::validation("order_id mismatch"));
        }
        Ok(())
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<OrderEvent>, DomainError> {
        if self.placed {
            return Err(DomainError::conflict("order already placed"));
        }
        if cmd.customer_name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if cmd.table_number.trim().is_empty() {
            return Err(DomainError::validation("table number cannot be empty"));
        }
        if cmd.lines.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }

        let mut lines = Vec::with_capacity(cmd.lines.len());
        let mut total: u64 = 0;
        for (idx, l) in cmd.lines.iter().enumerate() {
            if l.quantity < 1 {
                return Err(DomainError::validation(format!(
                    "line {}: quantity must be at least 1",
                    idx + 1
                )));
            }
            let line = OrderLine {
                line_no: (idx + 1) as u32,
                menu_item_id: l.menu_item_id,
                name: l.name.clone(),
                category: l.category,
                unit_price: l.unit_price,
                quantity: l.quantity,
            };
            total = line
                .subtotal()
                .and_then(|s| total.checked_add(s))
                .ok_or_else(|| DomainError::validation("order total overflow"))?;
            lines.push(line);
        }

        Ok(vec![OrderEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id,
            order_no: cmd.order_no.clone(),
            customer_name: cmd.customer_name.trim().to_string(),
            table_number: cmd.table_number.trim().to_string(),
            lines,
            total,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_advance(&self, cmd: &AdvanceStatus) -> Result<Vec<OrderEvent>, DomainError> {
        self.ensure_placed(cmd.order_id)?;

        let from = self.status;
        let to = cmd.target;
        if !from.can_transition_to(to) {
            return Err(DomainError::invalid_transition(format!(
                "cannot move order {} from {from} to {to}",
                self.order_no
            )));
        }
        if to == OrderStatus::Served && self.payment_status != PaymentStatus::Paid {
            return Err(DomainError::invalid_transition(format!(
                "order {} must be paid before it is served",
                self.order_no
            )));
        }

        Ok(vec![OrderEvent::StatusChanged(StatusChanged {
            order_id: cmd.order_id,
            from,
            to,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_payment(&self, cmd: &ApplyPayment) -> Result<Vec<OrderEvent>, DomainError> {
        self.ensure_placed(cmd.order_id)?;

        if self.status != OrderStatus::Ready {
            return Err(DomainError::invalid_transition(format!(
                "order {} is {}, payment requires ready",
                self.order_no, self.status
            )));
        }
        if self.payment_status == PaymentStatus::Paid {
            return Err(DomainError::invalid_transition(format!(
                "order {} is already paid",
                self.order_no
            )));
        }

        Ok(vec![OrderEvent::PaymentApplied(PaymentApplied {
            order_id: cmd.order_id,
            method: cmd.method,
            amount: self.total,
            occurred_at: cmd.occurred_at,
        })])
    }
}
