//! Per-user cart store.
//!
//! Cart aggregates (`total_items`, `subtotal`) are recomputed from the
//! current lines on every read. Nothing here maintains a running counter,
//! so the aggregate can never drift from the lines.

use std::collections::HashMap;
use std::sync::Arc;

use catalog::StockLedger;
use common::{Money, ProductId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::CartError;

/// Maximum quantity of a single product in one cart.
pub const MAX_QUANTITY_PER_PRODUCT: u32 = 10;

/// One (user, product) cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price captured when the line was last touched.
    pub unit_price: Money,
}

impl CartLine {
    /// Returns the line total (quantity x unit price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A cart as returned to callers: lines plus the freshly recomputed
/// aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_items: u32,
    pub subtotal: Money,
}

impl CartView {
    fn from_lines(mut lines: Vec<CartLine>) -> Self {
        lines.sort_by(|a, b| a.product_id.as_str().cmp(b.product_id.as_str()));
        let total_items = lines.iter().map(|l| l.quantity).sum();
        let subtotal = lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total());
        Self {
            lines,
            total_items,
            subtotal,
        }
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// In-memory cart store.
///
/// Validation always happens against the ledger's *current* stock, not the
/// stock at the time the line was first created.
#[derive(Clone)]
pub struct CartStore {
    ledger: StockLedger,
    carts: Arc<RwLock<HashMap<UserId, HashMap<ProductId, CartLine>>>>,
}

impl CartStore {
    /// Creates a new cart store validating against the given ledger.
    pub fn new(ledger: StockLedger) -> Self {
        Self {
            ledger,
            carts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Adds a product to a user's cart, merging with an existing line.
    ///
    /// A merged quantity is capped at [`MAX_QUANTITY_PER_PRODUCT`] and then
    /// re-validated against the current stock. Returns the recomputed cart.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartView, CartError> {
        if quantity == 0 || quantity > MAX_QUANTITY_PER_PRODUCT {
            return Err(CartError::InvalidQuantity { quantity });
        }

        let mut carts = self.carts.write().await;
        let lines = carts.entry(user_id).or_default();

        let merged = match lines.get(&product_id) {
            Some(existing) => (existing.quantity + quantity).min(MAX_QUANTITY_PER_PRODUCT),
            None => quantity,
        };

        // Re-validate against the stock as it is now.
        let product = self.ledger.check_available(&product_id, merged).await?;

        lines.insert(
            product_id.clone(),
            CartLine {
                product_id,
                product_name: product.name,
                quantity: merged,
                unit_price: product.unit_price,
            },
        );

        Ok(CartView::from_lines(lines.values().cloned().collect()))
    }

    /// Sets the quantity of an existing line. Zero deletes the line.
    #[tracing::instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartView, CartError> {
        let mut carts = self.carts.write().await;
        let lines = carts.entry(user_id).or_default();

        if !lines.contains_key(&product_id) {
            return Err(CartError::LineNotFound { product_id });
        }

        if quantity == 0 {
            lines.remove(&product_id);
            return Ok(CartView::from_lines(lines.values().cloned().collect()));
        }

        if quantity > MAX_QUANTITY_PER_PRODUCT {
            return Err(CartError::InvalidQuantity { quantity });
        }

        let product = self.ledger.check_available(&product_id, quantity).await?;

        if let Some(line) = lines.get_mut(&product_id) {
            line.quantity = quantity;
            line.unit_price = product.unit_price;
            line.product_name = product.name;
        }

        Ok(CartView::from_lines(lines.values().cloned().collect()))
    }

    /// Returns the user's cart with a freshly recomputed aggregate.
    pub async fn get_cart(&self, user_id: UserId) -> CartView {
        let carts = self.carts.read().await;
        let lines = carts
            .get(&user_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        CartView::from_lines(lines)
    }

    /// Deletes every line for a user.
    pub async fn clear(&self, user_id: UserId) {
        self.carts.write().await.remove(&user_id);
    }

    /// Atomically removes and returns every line for a user, sorted by sku.
    ///
    /// Checkout uses this to claim the cart: of two concurrent conversions
    /// for the same user, only one can take a non-empty cart.
    pub(crate) async fn take(&self, user_id: UserId) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = self
            .carts
            .write()
            .await
            .remove(&user_id)
            .map(|m| m.into_values().collect())
            .unwrap_or_default();
        lines.sort_by(|a, b| a.product_id.as_str().cmp(b.product_id.as_str()));
        lines
    }

    /// Puts taken lines back after a failed checkout. Lines the user added
    /// in the meantime win over the restored ones.
    pub(crate) async fn restore(&self, user_id: UserId, lines: Vec<CartLine>) {
        let mut carts = self.carts.write().await;
        let current = carts.entry(user_id).or_default();
        for line in lines {
            current.entry(line.product_id.clone()).or_insert(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CatalogError, ProductRecord};

    async fn store_with_stock(stock: u32) -> (CartStore, ProductId) {
        let ledger = StockLedger::new();
        let product_id = ProductId::new("SKU-TREATS-01");
        ledger
            .insert(ProductRecord::new(
                product_id.clone(),
                "Chicken Treats",
                Money::from_rupees(100),
                stock,
            ))
            .await;
        (CartStore::new(ledger), product_id)
    }

    #[tokio::test]
    async fn add_item_returns_recomputed_aggregate() {
        let (store, product_id) = store_with_stock(10).await;
        let user = UserId::new();

        let cart = store.add_item(user, product_id, 3).await.unwrap();
        assert_eq!(cart.total_items, 3);
        assert_eq!(cart.subtotal, Money::from_rupees(300));
    }

    #[tokio::test]
    async fn add_item_merges_existing_line() {
        let (store, product_id) = store_with_stock(10).await;
        let user = UserId::new();

        store.add_item(user, product_id.clone(), 3).await.unwrap();
        let cart = store.add_item(user, product_id, 2).await.unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
        assert_eq!(cart.total_items, 5);
    }

    #[tokio::test]
    async fn merge_caps_at_ten() {
        let (store, product_id) = store_with_stock(50).await;
        let user = UserId::new();

        store.add_item(user, product_id.clone(), 8).await.unwrap();
        let cart = store.add_item(user, product_id, 8).await.unwrap();

        assert_eq!(cart.lines[0].quantity, MAX_QUANTITY_PER_PRODUCT);
    }

    #[tokio::test]
    async fn add_beyond_stock_fails_and_leaves_cart_unchanged() {
        let (store, product_id) = store_with_stock(2).await;
        let user = UserId::new();

        let result = store.add_item(user, product_id, 5).await;
        match result {
            Err(CartError::Catalog(CatalogError::InsufficientStock { available, .. })) => {
                assert_eq!(available, 2)
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert!(store.get_cart(user).await.is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_add_is_invalid() {
        let (store, product_id) = store_with_stock(5).await;
        let result = store.add_item(UserId::new(), product_id, 0).await;
        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
    }

    #[tokio::test]
    async fn set_quantity_zero_deletes_line() {
        let (store, product_id) = store_with_stock(5).await;
        let user = UserId::new();

        store.add_item(user, product_id.clone(), 2).await.unwrap();
        let cart = store.set_quantity(user, product_id, 0).await.unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.total_items, 0);
        assert_eq!(cart.subtotal, Money::zero());
    }

    #[tokio::test]
    async fn set_quantity_on_missing_line_fails() {
        let (store, product_id) = store_with_stock(5).await;
        let result = store.set_quantity(UserId::new(), product_id, 2).await;
        assert!(matches!(result, Err(CartError::LineNotFound { .. })));
    }

    #[tokio::test]
    async fn set_quantity_revalidates_against_current_stock() {
        let (store, product_id) = store_with_stock(5).await;
        let user = UserId::new();

        store.add_item(user, product_id.clone(), 2).await.unwrap();
        let result = store.set_quantity(user, product_id, 8).await;
        assert!(matches!(
            result,
            Err(CartError::Catalog(CatalogError::InsufficientStock { .. }))
        ));
    }

    #[tokio::test]
    async fn aggregate_always_equals_sum_over_lines() {
        let ledger = StockLedger::new();
        for (sku, price, stock) in [
            ("SKU-A", 100, 10),
            ("SKU-B", 250, 10),
            ("SKU-C", 999, 10),
        ] {
            ledger
                .insert(ProductRecord::new(sku, sku, Money::from_rupees(price), stock))
                .await;
        }
        let store = CartStore::new(ledger);
        let user = UserId::new();

        store.add_item(user, ProductId::new("SKU-A"), 2).await.unwrap();
        store.add_item(user, ProductId::new("SKU-B"), 1).await.unwrap();
        store.add_item(user, ProductId::new("SKU-C"), 4).await.unwrap();
        store
            .set_quantity(user, ProductId::new("SKU-B"), 3)
            .await
            .unwrap();
        let cart = store
            .set_quantity(user, ProductId::new("SKU-A"), 0)
            .await
            .unwrap();

        let expected_items: u32 = cart.lines.iter().map(|l| l.quantity).sum();
        let expected_subtotal = cart
            .lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total());
        assert_eq!(cart.total_items, expected_items);
        assert_eq!(cart.subtotal, expected_subtotal);
        assert_eq!(cart.total_items, 7);
        assert_eq!(cart.subtotal, Money::from_rupees(3 * 250 + 4 * 999));
    }

    #[tokio::test]
    async fn clear_removes_all_lines() {
        let (store, product_id) = store_with_stock(5).await;
        let user = UserId::new();

        store.add_item(user, product_id, 2).await.unwrap();
        store.clear(user).await;

        assert!(store.get_cart(user).await.is_empty());
    }
}
