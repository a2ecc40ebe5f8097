//! Product records held by the stock ledger.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A product as the ledger knows it.
///
/// `stock` is the authoritative available quantity; it never goes below
/// zero. Only [`crate::StockLedger::reserve`] and
/// [`crate::StockLedger::restock`] mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product identifier (SKU).
    pub id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Price per unit.
    pub unit_price: Money,

    /// Units currently available for sale.
    pub stock: u32,

    /// Whether the product is active for sale.
    pub active: bool,
}

impl ProductRecord {
    /// Creates a new active product record.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            stock,
            active: true,
        }
    }

    /// Returns a copy of this record marked inactive.
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_is_active() {
        let product = ProductRecord::new("SKU-TREATS-01", "Chicken Treats", Money::from_rupees(100), 5);
        assert!(product.active);
        assert_eq!(product.stock, 5);
    }

    #[test]
    fn deactivated_clears_flag() {
        let product =
            ProductRecord::new("SKU-TREATS-01", "Chicken Treats", Money::from_rupees(100), 5)
                .deactivated();
        assert!(!product.active);
    }
}
