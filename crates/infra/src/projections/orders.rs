use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use warung_events::{EventEnvelope, Projection};
use warung_orders::{
    AGGREGATE_TYPE, OrderEvent, OrderId, OrderLine, OrderStatus, PaymentMethod, PaymentStatus,
};
use warung_reports::{LineRecord, OrderRecord};

use crate::projections::cursor::{CursorCheck, ProjectionError, StreamCursors};
use crate::read_model::ReadStore;

/// Queryable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReadModel {
    pub id: OrderId,
    pub order_no: String,
    pub customer_name: String,
    pub table_number: String,
    pub lines: Vec<OrderLine>,
    pub total: u64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl OrderReadModel {
    /// Snapshot for the reporting functions.
    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            order_no: self.order_no.clone(),
            customer_name: self.customer_name.clone(),
            table_number: self.table_number.clone(),
            lines: self
                .lines
                .iter()
                .map(|l| LineRecord {
                    menu_item_id: l.menu_item_id,
                    name: l.name.clone(),
                    category: l.category,
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                })
                .collect(),
            total: self.total,
            status: self.status,
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug)]
pub struct OrdersProjection<S>
where
    S: ReadStore<OrderId, OrderReadModel>,
{
    store: S,
    cursors: StreamCursors,
}

impl<S> OrdersProjection<S>
where
    S: ReadStore<OrderId, OrderReadModel>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            cursors: StreamCursors::new(),
        }
    }

    pub fn get(&self, order_id: &OrderId) -> Option<OrderReadModel> {
        self.store.get(order_id)
    }

    /// All orders in placement order, optionally restricted to one status.
    pub fn list(&self, status: Option<OrderStatus>) -> Vec<OrderReadModel> {
        let mut orders: Vec<_> = self
            .store
            .list()
            .into_iter()
            .filter(|o| status.is_none_or(|s| s == o.status))
            .collect();
        orders.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_no.cmp(&b.order_no))
        });
        orders
    }

    pub fn records(&self) -> Vec<OrderRecord> {
        self.list(None).iter().map(OrderReadModel::to_record).collect()
    }

    pub fn count(&self) -> usize {
        self.store.list().len()
    }
}

impl<S> Projection for OrdersProjection<S>
where
    S: ReadStore<OrderId, OrderReadModel>,
{
    type Error = ProjectionError;

    fn name(&self) -> &'static str {
        "orders.list"
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

        let ev: OrderEvent = serde_json::from_value(envelope.payload().clone()).map_err(|e| {
            ProjectionError::Deserialize {
                aggregate_type: AGGREGATE_TYPE,
                message: e.to_string(),
            }
        })?;
        let order_id = ev.order_id();
        if order_id.0 != aggregate_id {
            return Err(ProjectionError::StreamMismatch(order_id.to_string()));
        }

        match ev {
            OrderEvent::OrderPlaced(e) => {
                self.store.upsert(
                    e.order_id,
                    OrderReadModel {
                        id: e.order_id,
                        order_no: e.order_no,
                        customer_name: e.customer_name,
                        table_number: e.table_number,
                        lines: e.lines,
                        total: e.total,
                        status: OrderStatus::Pending,
                        payment_status: PaymentStatus::Unpaid,
                        payment_method: None,
                        created_at: e.occurred_at,
                        paid_at: None,
                        updated_at: e.occurred_at,
                    },
                );
            }
            OrderEvent::StatusChanged(e) => {
                if let Some(mut rm) = self.store.get(&e.order_id) {
                    rm.status = e.to;
                    rm.updated_at = e.occurred_at;
                    self.store.upsert(e.order_id, rm);
                }
            }
            OrderEvent::PaymentApplied(e) => {
                if let Some(mut rm) = self.store.get(&e.order_id) {
                    rm.payment_method = Some(e.method);
                    rm.payment_status = PaymentStatus::Paid;
                    rm.status = OrderStatus::Served;
                    rm.paid_at = Some(e.occurred_at);
                    rm.updated_at = e.occurred_at;
                    self.store.upsert(e.order_id, rm);
                }
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
