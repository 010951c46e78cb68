use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::info;

use warung_core::{Aggregate, DomainError};
use warung_events::{Event, EventEnvelope, InMemoryEventBus, Projection};
use warung_menu::{
    AddMenuItem, MenuCommand, MenuItem, MenuItemDetails, MenuItemId, RemoveMenuItem,
    SetAvailability, UpdateMenuItem,
};
use warung_orders::{
    AdvanceStatus, ApplyPayment, NewOrderLine, Order, OrderCommand, OrderId, OrderStatus,
    PaymentMethod, PlaceOrder, format_order_number,
};
use warung_reports::{
    DateRange, Dashboard, PaymentBreakdown, ReportPeriod, SalesReport, StockRecord, TopItem,
};
use warung_stock::{
    Consume, RegisterStockItem, RemoveStockItem, Restock, StockCommand, StockItem,
    StockItemDetails, StockItemId, StockLevel, UpdateStockItem,
};

use crate::command_dispatcher::{CommandDispatcher, DispatchError};
use crate::config::Config;
use crate::event_store::{EventStore, EventStoreError, InMemoryEventStore, StoredEvent};
use crate::projections::{
    MenuCatalogProjection, MenuFilter, MenuItemReadModel, OrderReadModel, OrdersProjection,
    ProjectionError, StockFilter, StockItemReadModel, StockLedgerProjection,
};
use crate::read_model::InMemoryReadStore;

pub type EnvelopeBus = InMemoryEventBus<EventEnvelope<JsonValue>>;

pub(crate) type Dispatcher = CommandDispatcher<Arc<InMemoryEventStore>, Arc<EnvelopeBus>>;
type MenuProjection = MenuCatalogProjection<InMemoryReadStore<MenuItemId, MenuItemReadModel>>;
type StockProjection = StockLedgerProjection<InMemoryReadStore<StockItemId, StockItemReadModel>>;
type OrderProjection = OrdersProjection<InMemoryReadStore<OrderId, OrderReadModel>>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionError),
}

impl LedgerError {
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Dispatch(e) => e.code(),
            LedgerError::Projection(_) => "projection_error",
        }
    }

    /// True when the events reached the log before the failure.
    pub fn committed(&self) -> bool {
        matches!(
            self,
            LedgerError::Projection(_) | LedgerError::Dispatch(DispatchError::Publish(_))
        )
    }
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        LedgerError::Dispatch(value.into())
    }
}

impl From<EventStoreError> for LedgerError {
    fn from(value: EventStoreError) -> Self {
        LedgerError::Dispatch(value.into())
    }
}

/// Order line as requested by a caller: which menu item, how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequestLine {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

/// Stock item together with its derived level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockItemView {
    pub item: StockItemReadModel,
    pub level: StockLevel,
}

/// Application service for the whole back office.
///
/// Every command goes through the dispatcher and the committed events are
/// applied to the read models before the call returns, so reads issued after
/// a successful command always see its effect. The same envelopes are also
/// published on the bus for any other subscriber.
pub struct Ledger {
    dispatcher: Dispatcher,
    menu: MenuProjection,
    stock: StockProjection,
    orders: OrderProjection,
    /// Last order number handed out. Held across the dispatch so numbers
    /// are gapless. Always taken before `commit_lock`.
    order_seq: Mutex<u64>,
    /// Serializes append and projection apply so the read models see every
    /// stream in sequence order.
    commit_lock: Mutex<()>,
    low_stock_multiplier: Decimal,
    recent_orders: usize,
}

impl Ledger {
    pub fn new(config: &Config) -> Self {
        Self {
            dispatcher: CommandDispatcher::new(
                Arc::new(InMemoryEventStore::new()),
                Arc::new(EnvelopeBus::new()),
            ),
            menu: MenuCatalogProjection::new(InMemoryReadStore::new()),
            stock: StockLedgerProjection::new(InMemoryReadStore::new()),
            orders: OrdersProjection::new(InMemoryReadStore::new()),
            order_seq: Mutex::new(0),
            commit_lock: Mutex::new(()),
            low_stock_multiplier: config.low_stock_multiplier,
            recent_orders: config.recent_orders,
        }
    }

    pub fn bus(&self) -> &Arc<EnvelopeBus> {
        self.dispatcher.bus()
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn commit_guard(&self) -> Result<MutexGuard<'_, ()>, LedgerError> {
        self.commit_lock
            .lock()
            .map_err(|_| EventStoreError::Unavailable("commit lock poisoned".to_string()).into())
    }

    pub fn low_stock_multiplier(&self) -> Decimal {
        self.low_stock_multiplier
    }

    fn dispatch<A>(
        &self,
        aggregate_id: warung_core::AggregateId,
        aggregate_type: &str,
        command: A::Command,
        make: impl FnOnce(warung_core::AggregateId) -> A,
    ) -> Result<Vec<StoredEvent>, LedgerError>
    where
        A: Aggregate<Error = DomainError>,
        A::Event: Event + serde::Serialize + serde::de::DeserializeOwned,
    {
        let _guard = self.commit_guard()?;
        let committed = self
            .dispatcher
            .dispatch::<A>(aggregate_id, aggregate_type, command, make)?;

        for stored in &committed {
            let envelope = stored.to_envelope();
            self.menu.apply_envelope(&envelope)?;
            self.stock.apply_envelope(&envelope)?;
            self.orders.apply_envelope(&envelope)?;
        }
        Ok(committed)
    }

    // ---- menu catalog ----

    pub fn add_menu_item(&self, details: MenuItemDetails) -> Result<MenuItemReadModel, LedgerError> {
        let item_id = MenuItemId::generate();
        self.dispatch::<MenuItem>(
            item_id.0,
            warung_menu::AGGREGATE_TYPE,
            MenuCommand::AddMenuItem(AddMenuItem {
                item_id,
                details,
                occurred_at: Utc::now(),
            }),
            |id| MenuItem::empty(MenuItemId::new(id)),
        )?;
        info!(%item_id, "menu item added");
        self.menu_item_or_not_found(&item_id)
    }

    pub fn update_menu_item(
        &self,
        item_id: MenuItemId,
        details: MenuItemDetails,
    ) -> Result<MenuItemReadModel, LedgerError> {
        self.dispatch::<MenuItem>(
            item_id.0,
            warung_menu::AGGREGATE_TYPE,
            MenuCommand::UpdateMenuItem(UpdateMenuItem {
                item_id,
                details,
                occurred_at: Utc::now(),
            }),
            |id| MenuItem::empty(MenuItemId::new(id)),
        )?;
        self.menu_item_or_not_found(&item_id)
    }

    pub fn set_availability(
        &self,
        item_id: MenuItemId,
        available: bool,
    ) -> Result<MenuItemReadModel, LedgerError> {
        self.dispatch::<MenuItem>(
            item_id.0,
            warung_menu::AGGREGATE_TYPE,
            MenuCommand::SetAvailability(SetAvailability {
                item_id,
                available,
                occurred_at: Utc::now(),
            }),
            |id| MenuItem::empty(MenuItemId::new(id)),
        )?;
        self.menu_item_or_not_found(&item_id)
    }

    pub fn remove_menu_item(&self, item_id: MenuItemId) -> Result<(), LedgerError> {
        self.dispatch::<MenuItem>(
            item_id.0,
            warung_menu::AGGREGATE_TYPE,
            MenuCommand::RemoveMenuItem(RemoveMenuItem {
                item_id,
                occurred_at: Utc::now(),
            }),
            |id| MenuItem::empty(MenuItemId::new(id)),
        )?;
        info!(%item_id, "menu item removed");
        Ok(())
    }

    pub fn menu_item(&self, item_id: &MenuItemId) -> Option<MenuItemReadModel> {
        self.menu.get(item_id)
    }

    pub fn list_menu(&self, filter: &MenuFilter) -> Vec<MenuItemReadModel> {
        self.menu.list(filter)
    }

    fn menu_item_or_not_found(&self, item_id: &MenuItemId) -> Result<MenuItemReadModel, LedgerError> {
        self.menu
            .get(item_id)
            .ok_or_else(|| DomainError::not_found().into())
    }

    // ---- stock ledger ----

    pub fn register_stock_item(
        &self,
        details: StockItemDetails,
    ) -> Result<StockItemView, LedgerError> {
        let item_id = StockItemId::generate();
        self.dispatch_stock(
            item_id,
            StockCommand::RegisterStockItem(RegisterStockItem {
                item_id,
                details,
                occurred_at: Utc::now(),
            }),
        )?;
        info!(%item_id, "stock item registered");
        self.stock_view_or_not_found(&item_id)
    }

    pub fn update_stock_item(
        &self,
        item_id: StockItemId,
        details: StockItemDetails,
    ) -> Result<StockItemView, LedgerError> {
        self.dispatch_stock(
            item_id,
            StockCommand::UpdateStockItem(UpdateStockItem {
                item_id,
                details,
                occurred_at: Utc::now(),
            }),
        )?;
        self.stock_view_or_not_found(&item_id)
    }

    pub fn restock(&self, item_id: StockItemId, amount: Decimal) -> Result<StockItemView, LedgerError> {
        self.dispatch_stock(
            item_id,
            StockCommand::Restock(Restock {
                item_id,
                amount,
                occurred_at: Utc::now(),
            }),
        )?;
        let view = self.stock_view_or_not_found(&item_id)?;
        info!(%item_id, %amount, level = view.level.as_str(), "stock restocked");
        Ok(view)
    }

    pub fn consume(&self, item_id: StockItemId, amount: Decimal) -> Result<StockItemView, LedgerError> {
        self.dispatch_stock(
            item_id,
            StockCommand::Consume(Consume {
                item_id,
                amount,
                occurred_at: Utc::now(),
            }),
        )?;
        let view = self.stock_view_or_not_found(&item_id)?;
        if view.level == StockLevel::Critical {
            info!(%item_id, name = %view.item.name, "stock item at critical level");
        }
        Ok(view)
    }

    pub fn remove_stock_item(&self, item_id: StockItemId) -> Result<(), LedgerError> {
        self.dispatch_stock(
            item_id,
            StockCommand::RemoveStockItem(RemoveStockItem {
                item_id,
                occurred_at: Utc::now(),
            }),
        )?;
        info!(%item_id, "stock item removed");
        Ok(())
    }

    pub fn stock_item(&self, item_id: &StockItemId) -> Option<StockItemView> {
        self.stock.get(item_id).map(|item| self.view(item))
    }

    pub fn list_stock(&self, filter: &StockFilter) -> Vec<StockItemView> {
        self.stock
            .list(filter)
            .into_iter()
            .map(|item| self.view(item))
            .collect()
    }

    /// Items at critical level.
    pub fn low_stock(&self) -> Vec<StockItemView> {
        self.stock
            .critical(self.low_stock_multiplier)
            .into_iter()
            .map(|item| self.view(item))
            .collect()
    }

    fn dispatch_stock(&self, item_id: StockItemId, command: StockCommand) -> Result<(), LedgerError> {
        self.dispatch::<StockItem>(item_id.0, warung_stock::AGGREGATE_TYPE, command, |id| {
            StockItem::empty(StockItemId::new(id))
        })?;
        Ok(())
    }

    fn view(&self, item: StockItemReadModel) -> StockItemView {
        let level = item.level(self.low_stock_multiplier);
        StockItemView { item, level }
    }

    fn stock_view_or_not_found(&self, item_id: &StockItemId) -> Result<StockItemView, LedgerError> {
        self.stock_item(item_id)
            .ok_or_else(|| DomainError::not_found().into())
    }

    // ---- orders ----

    /// Place an order, snapshotting name, category and price from the menu.
    pub fn create_order(
        &self,
        customer_name: &str,
        table_number: &str,
        lines: &[OrderRequestLine],
    ) -> Result<OrderReadModel, LedgerError> {
        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            let item = self
                .menu
                .get(&line.menu_item_id)
                .ok_or_else(DomainError::not_found)?;
            if !item.available {
                return Err(DomainError::validation(format!(
                    "menu item '{}' is not available",
                    item.name
                ))
                .into());
            }
            resolved.push(NewOrderLine {
                menu_item_id: item.id,
                name: item.name,
                category: item.category,
                unit_price: item.price,
                quantity: line.quantity,
            });
        }

        let mut seq = self
            .order_seq
            .lock()
            .map_err(|_| EventStoreError::Unavailable("order sequence lock poisoned".to_string()))?;
        let next = *seq + 1;
        let order_no = format_order_number(next);
        let order_id = OrderId::generate();

        let result = self.dispatch::<Order>(
            order_id.0,
            warung_orders::AGGREGATE_TYPE,
            OrderCommand::PlaceOrder(PlaceOrder {
                order_id,
                order_no: order_no.clone(),
                customer_name: customer_name.to_string(),
                table_number: table_number.to_string(),
                lines: resolved,
                occurred_at: Utc::now(),
            }),
            |id| Order::empty(OrderId::new(id)),
        );
        // The number is spent once the event is in the log, even if a later
        // step failed.
        if result.as_ref().map_or_else(LedgerError::committed, |_| true) {
            *seq = next;
        }
        drop(seq);
        result?;

        let order = self.order_or_not_found(&order_id)?;
        info!(order_no = %order.order_no, total = order.total, lines = order.lines.len(), "order placed");
        Ok(order)
    }

    pub fn advance_status(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<OrderReadModel, LedgerError> {
        self.dispatch::<Order>(
            order_id.0,
            warung_orders::AGGREGATE_TYPE,
            OrderCommand::AdvanceStatus(AdvanceStatus {
                order_id,
                target,
                occurred_at: Utc::now(),
            }),
            |id| Order::empty(OrderId::new(id)),
        )?;
        let order = self.order_or_not_found(&order_id)?;
        info!(order_no = %order.order_no, status = order.status.as_str(), "order status changed");
        Ok(order)
    }

    pub fn apply_payment(
        &self,
        order_id: OrderId,
        method: PaymentMethod,
    ) -> Result<OrderReadModel, LedgerError> {
        self.dispatch::<Order>(
            order_id.0,
            warung_orders::AGGREGATE_TYPE,
            OrderCommand::ApplyPayment(ApplyPayment {
                order_id,
                method,
                occurred_at: Utc::now(),
            }),
            |id| Order::empty(OrderId::new(id)),
        )?;
        let order = self.order_or_not_found(&order_id)?;
        info!(order_no = %order.order_no, method = method.as_str(), total = order.total, "order paid");
        Ok(order)
    }

    pub fn order(&self, order_id: &OrderId) -> Option<OrderReadModel> {
        self.orders.get(order_id)
    }

    pub fn list_orders(&self, status: Option<OrderStatus>) -> Vec<OrderReadModel> {
        self.orders.list(status)
    }

    fn order_or_not_found(&self, order_id: &OrderId) -> Result<OrderReadModel, LedgerError> {
        self.orders
            .get(order_id)
            .ok_or_else(|| DomainError::not_found().into())
    }

    // ---- reports ----

    pub fn sales_report(&self, period: ReportPeriod, range: DateRange) -> SalesReport {
        warung_reports::report(&self.orders.records(), period, range)
    }

    pub fn top_items(&self, range: &DateRange, limit: usize) -> Vec<TopItem> {
        warung_reports::top_items(&self.orders.records(), range, limit)
    }

    pub fn payment_breakdown(&self, range: &DateRange) -> Vec<PaymentBreakdown> {
        warung_reports::payment_breakdown(&self.orders.records(), range)
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let stock: Vec<StockRecord> = self
            .stock
            .list(&StockFilter::default())
            .into_iter()
            .map(|item| StockRecord {
                level: item.level(self.low_stock_multiplier),
                name: item.name,
            })
            .collect();
        warung_reports::dashboard(&self.orders.records(), &stock, today, self.recent_orders)
    }

    // ---- maintenance ----

    /// Drop every read model and replay the event log into it.
    pub fn rebuild_projections(&self) -> Result<(), LedgerError> {
        let _guard = self.commit_guard()?;
        let store = self.dispatcher.store();
        let envelopes = |aggregate_type: &str| -> Result<Vec<EventEnvelope<JsonValue>>, LedgerError> {
            Ok(store
                .load_all(aggregate_type)?
                .iter()
                .map(StoredEvent::to_envelope)
                .collect())
        };

        self.menu.rebuild(envelopes(warung_menu::AGGREGATE_TYPE)?)?;
        self.stock.rebuild(envelopes(warung_stock::AGGREGATE_TYPE)?)?;
        self.orders.rebuild(envelopes(warung_orders::AGGREGATE_TYPE)?)?;

        info!(
            menu = self.menu.list(&MenuFilter::default()).len(),
            stock = self.stock.list(&StockFilter::default()).len(),
            orders = self.orders.count(),
            "projections rebuilt"
        );
        Ok(())
    }
}
