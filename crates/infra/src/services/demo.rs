//! Demo catalog for a fresh warung: six menu items and five stock items.

use rust_decimal::Decimal;
use tracing::info;

use warung_menu::{MenuCategory, MenuItemDetails};
use warung_stock::{StockCategory, StockItemDetails};

use super::ledger::{Ledger, LedgerError};

const MENU: [(&str, MenuCategory, u64, &str, u32); 6] = [
    (
        "Nasi Gudeg",
        MenuCategory::Main,
        25_000,
        "Nasi gudeg khas Yogyakarta dengan ayam dan telur",
        20,
    ),
    ("Gado-gado", MenuCategory::Main, 20_000, "Salad Indonesia dengan saus kacang", 15),
    ("Kerupuk Udang", MenuCategory::Appetizer, 8_000, "Kerupuk udang crispy", 50),
    ("Lumpia", MenuCategory::Appetizer, 12_000, "Lumpia sayuran segar", 30),
    ("Es Teh Manis", MenuCategory::Drink, 8_000, "Teh manis dingin segar", 100),
    ("Jus Jeruk", MenuCategory::Drink, 15_000, "Jus jeruk segar tanpa pengawet", 25),
];

const STOCK: [(&str, StockCategory, i64, i64, &str, u64, &str); 5] = [
    ("Beras", StockCategory::Ingredient, 50, 20, "kg", 12_000, "Toko Beras Maju"),
    ("Ayam", StockCategory::Ingredient, 15, 10, "kg", 35_000, "Pasar Tradisional"),
    ("Teh Celup", StockCategory::Beverage, 8, 15, "kotak", 25_000, "Distributor Minuman"),
    ("Gula", StockCategory::Ingredient, 25, 10, "kg", 14_000, "Toko Kelontong"),
    ("Gelas Plastik", StockCategory::Packaging, 200, 100, "pcs", 500, "Supplier Kemasan"),
];

/// Load the demo menu and stock through the regular command path.
pub fn seed_demo(ledger: &Ledger) -> Result<(), LedgerError> {
    for (name, category, price, description, stock) in MENU {
        ledger.add_menu_item(MenuItemDetails {
            name: name.to_string(),
            category,
            price,
            description: description.to_string(),
            stock,
        })?;
    }

    for (name, category, current, min, unit, cost, supplier) in STOCK {
        ledger.register_stock_item(StockItemDetails {
            name: name.to_string(),
            category,
            current_stock: Decimal::from(current),
            min_stock: Decimal::from(min),
            unit: unit.to_string(),
            cost,
            supplier: supplier.to_string(),
        })?;
    }

    info!(menu = MENU.len(), stock = STOCK.len(), "demo data seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::projections::{MenuFilter, StockFilter};
    use warung_stock::StockLevel;

    #[test]
    fn seeds_menu_and_stock() {
        let ledger = Ledger::new(&Config::default());
        seed_demo(&ledger).unwrap();

        let menu = ledger.list_menu(&MenuFilter::default());
        assert_eq!(menu.len(), 6);
        assert!(menu.iter().all(|m| m.available));

        let stock = ledger.list_stock(&StockFilter::default());
        assert_eq!(stock.len(), 5);

        // Teh Celup starts below its minimum.
        let low = ledger.low_stock();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].item.name, "Teh Celup");
        assert_eq!(low[0].level, StockLevel::Critical);
    }
}
