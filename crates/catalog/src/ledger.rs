//! The authoritative per-product stock ledger.

use std::collections::HashMap;
use std::sync::Arc;

use common::ProductId;
use tokio::sync::RwLock;

use crate::error::{CatalogError, Result};
use crate::product::ProductRecord;

/// In-memory stock ledger.
///
/// All quantity checks and decrements for one call happen under a single
/// write lock, so a contested decrement has exactly one winner; every loser
/// observes the post-decrement quantity and fails with
/// [`CatalogError::InsufficientStock`].
#[derive(Clone, Default)]
pub struct StockLedger {
    products: Arc<RwLock<HashMap<ProductId, ProductRecord>>>,
}

fn check(record: &ProductRecord, requested: u32) -> Result<()> {
    if !record.active {
        return Err(CatalogError::ProductUnavailable(record.id.clone()));
    }
    if record.stock < requested {
        return Err(CatalogError::InsufficientStock {
            product_id: record.id.clone(),
            requested,
            available: record.stock,
        });
    }
    Ok(())
}

impl StockLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product record. Used for seeding.
    pub async fn insert(&self, record: ProductRecord) {
        self.products.write().await.insert(record.id.clone(), record);
    }

    /// Returns a snapshot of a product record.
    pub async fn get(&self, product_id: &ProductId) -> Result<ProductRecord> {
        self.products
            .read()
            .await
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))
    }

    /// Returns all product records.
    pub async fn all(&self) -> Vec<ProductRecord> {
        self.products.read().await.values().cloned().collect()
    }

    /// Returns the currently available quantity for a product.
    pub async fn available(&self, product_id: &ProductId) -> Result<u32> {
        Ok(self.get(product_id).await?.stock)
    }

    /// Validates that `requested` units of an active product are available
    /// right now, returning a snapshot of the record.
    ///
    /// This is a read: the stock may change before a later [`reserve`].
    /// Cart validation uses it; checkout must not.
    ///
    /// [`reserve`]: StockLedger::reserve
    pub async fn check_available(
        &self,
        product_id: &ProductId,
        requested: u32,
    ) -> Result<ProductRecord> {
        let products = self.products.read().await;
        let record = products
            .get(product_id)
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))?;
        check(record, requested)?;
        Ok(record.clone())
    }

    /// Atomically checks and decrements stock for every line.
    ///
    /// Either every line is decremented or none is: the first shortfall
    /// aborts the whole reservation before any stock has moved. Returns
    /// pre-decrement snapshots in line order so callers can freeze prices
    /// and names at purchase time.
    #[tracing::instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn reserve(&self, lines: &[(ProductId, u32)]) -> Result<Vec<ProductRecord>> {
        let mut products = self.products.write().await;

        // Validate everything before touching anything.
        let mut snapshots = Vec::with_capacity(lines.len());
        for (product_id, quantity) in lines {
            let record = products
                .get(product_id)
                .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))?;
            check(record, *quantity)?;
            snapshots.push(record.clone());
        }

        for (product_id, quantity) in lines {
            if let Some(record) = products.get_mut(product_id) {
                record.stock -= quantity;
            }
        }

        metrics::counter!("catalog_reservations_total").increment(1);
        Ok(snapshots)
    }

    /// Adds stock back for a product, returning the new quantity.
    ///
    /// The quantity saturates at `u32::MAX` rather than wrapping.
    pub async fn restock(&self, product_id: &ProductId, quantity: u32) -> Result<u32> {
        let mut products = self.products.write().await;
        let record = products
            .get_mut(product_id)
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))?;
        record.stock = record.stock.saturating_add(quantity);
        Ok(record.stock)
    }

    /// Returns the number of products in the ledger.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    async fn seeded_ledger() -> StockLedger {
        let ledger = StockLedger::new();
        ledger
            .insert(ProductRecord::new(
                "SKU-TREATS-01",
                "Chicken Treats",
                Money::from_rupees(100),
                5,
            ))
            .await;
        ledger
            .insert(ProductRecord::new(
                "SKU-LEASH-02",
                "Nylon Leash",
                Money::from_rupees(500),
                2,
            ))
            .await;
        ledger
    }

    #[tokio::test]
    async fn get_returns_snapshot() {
        let ledger = seeded_ledger().await;
        let record = ledger.get(&ProductId::new("SKU-TREATS-01")).await.unwrap();
        assert_eq!(record.name, "Chicken Treats");
        assert_eq!(record.stock, 5);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let ledger = seeded_ledger().await;
        let result = ledger.get(&ProductId::new("SKU-NOPE")).await;
        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn check_available_rejects_inactive() {
        let ledger = StockLedger::new();
        ledger
            .insert(
                ProductRecord::new("SKU-OLD", "Discontinued Toy", Money::from_rupees(50), 3)
                    .deactivated(),
            )
            .await;

        let result = ledger.check_available(&ProductId::new("SKU-OLD"), 1).await;
        assert!(matches!(result, Err(CatalogError::ProductUnavailable(_))));
    }

    #[tokio::test]
    async fn check_available_reports_available_quantity() {
        let ledger = seeded_ledger().await;
        let result = ledger
            .check_available(&ProductId::new("SKU-LEASH-02"), 5)
            .await;
        match result {
            Err(CatalogError::InsufficientStock { available, .. }) => assert_eq!(available, 2),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reserve_decrements_all_lines() {
        let ledger = seeded_ledger().await;
        let lines = vec![
            (ProductId::new("SKU-TREATS-01"), 3),
            (ProductId::new("SKU-LEASH-02"), 1),
        ];

        let snapshots = ledger.reserve(&lines).await.unwrap();
        assert_eq!(snapshots.len(), 2);
        // Snapshots are pre-decrement
        assert_eq!(snapshots[0].stock, 5);

        assert_eq!(
            ledger.available(&ProductId::new("SKU-TREATS-01")).await.unwrap(),
            2
        );
        assert_eq!(
            ledger.available(&ProductId::new("SKU-LEASH-02")).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn reserve_is_all_or_nothing() {
        let ledger = seeded_ledger().await;
        let lines = vec![
            (ProductId::new("SKU-TREATS-01"), 3),
            (ProductId::new("SKU-LEASH-02"), 10), // short
        ];

        let result = ledger.reserve(&lines).await;
        assert!(matches!(
            result,
            Err(CatalogError::InsufficientStock { .. })
        ));

        // Nothing moved, including the line that would have succeeded.
        assert_eq!(
            ledger.available(&ProductId::new("SKU-TREATS-01")).await.unwrap(),
            5
        );
        assert_eq!(
            ledger.available(&ProductId::new("SKU-LEASH-02")).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn contested_last_unit_has_one_winner() {
        let ledger = StockLedger::new();
        ledger
            .insert(ProductRecord::new(
                "SKU-BED-03",
                "Orthopedic Bed",
                Money::from_rupees(2000),
                1,
            ))
            .await;

        let lines = vec![(ProductId::new("SKU-BED-03"), 1)];
        let (a, b) = tokio::join!(ledger.reserve(&lines), ledger.reserve(&lines));

        let successes = [a.is_ok(), b.is_ok()].iter().filter(|s| **s).count();
        assert_eq!(successes, 1);
        assert_eq!(
            ledger.available(&ProductId::new("SKU-BED-03")).await.unwrap(),
            0
        );

        // The loser observed the post-decrement quantity.
        let loser = if a.is_err() { a } else { b };
        match loser {
            Err(CatalogError::InsufficientStock { available, .. }) => assert_eq!(available, 0),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn restock_adds_quantity() {
        let ledger = seeded_ledger().await;
        let new_stock = ledger
            .restock(&ProductId::new("SKU-LEASH-02"), 8)
            .await
            .unwrap();
        assert_eq!(new_stock, 10);
    }

    #[tokio::test]
    async fn restock_saturates_instead_of_wrapping() {
        let ledger = StockLedger::new();
        ledger
            .insert(ProductRecord::new(
                "SKU-FOOD-01",
                "Premium Dog Food",
                Money::from_rupees(1200),
                u32::MAX - 1,
            ))
            .await;

        let new_stock = ledger
            .restock(&ProductId::new("SKU-FOOD-01"), 5)
            .await
            .unwrap();
        assert_eq!(new_stock, u32::MAX);
    }
}
