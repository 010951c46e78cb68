//! `warung-reports`
//!
//! Sales reporting and dashboard figures folded from order snapshots.
//!
//! Nothing here holds state: every report is recomputed from the order log on
//! demand, so it never drifts from the orders themselves.

pub mod dashboard;
pub mod period;
pub mod record;
pub mod sales;

pub use dashboard::{DEFAULT_RECENT_ORDERS, Dashboard, RecentOrder, dashboard};
pub use period::{DateRange, ReportPeriod};
pub use record::{LineRecord, OrderRecord, StockRecord};
pub use sales::{
    PaymentBreakdown, PeriodSummary, SalesReport, SalesTotals, TopItem, aggregate,
    payment_breakdown, report, top_items, totals,
};
