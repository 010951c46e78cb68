//! Derived stock status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default low-stock multiplier over `min_stock` (1.5×).
pub const DEFAULT_LOW_STOCK_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Display status of a stock item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    /// At or below the minimum.
    Critical,
    /// Above the minimum but within `min × multiplier`.
    Low,
    Good,
}

impl StockLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Low => "low",
            StockLevel::Good => "good",
        }
    }
}

/// Classify a stock snapshot. Checks are inclusive: `current == min` is critical.
///
/// A low threshold beyond the `Decimal` range is unreachable, so such items
/// above their minimum are `Low`.
pub fn stock_level(current: Decimal, min: Decimal, low_multiplier: Decimal) -> StockLevel {
    if current <= min {
        return StockLevel::Critical;
    }
    match min.checked_mul(low_multiplier) {
        Some(threshold) if current > threshold => StockLevel::Good,
        _ => StockLevel::Low,
    }
}
