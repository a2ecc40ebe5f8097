//! Cart to order conversion.

use chrono::Utc;
use common::{Money, OrderId, UserId};

use crate::cart::CartStore;
use crate::error::CheckoutError;
use crate::order::{Address, Order, OrderItem, OrderStatus, OrderStore, PaymentMethod};
use crate::pricing::PriceBreakdown;
use catalog::StockLedger;

/// Converts carts into orders.
///
/// The conversion is all-or-nothing: the cart is claimed atomically, every
/// line is validated and decremented under a single ledger lock, and a
/// failed checkout puts the claimed lines back, so both the stock and the
/// cart end up exactly as they were. Two checkouts racing for the last
/// unit of a product produce exactly one order, and two checkouts racing
/// for the *same cart* do too: the second one finds the cart already
/// claimed and fails with `EmptyCart`.
#[derive(Clone)]
pub struct CheckoutService {
    carts: CartStore,
    ledger: StockLedger,
    orders: OrderStore,
}

impl CheckoutService {
    /// Creates a checkout service over the given stores.
    pub fn new(carts: CartStore, ledger: StockLedger, orders: OrderStore) -> Self {
        Self {
            carts,
            ledger,
            orders,
        }
    }

    /// Converts the user's cart into an order.
    ///
    /// Item name and unit price are frozen from the catalog as it stands at
    /// this moment, not from when the line entered the cart. On success the
    /// cart is cleared.
    #[tracing::instrument(skip(self, shipping_address, billing_address))]
    pub async fn place_order(
        &self,
        user_id: UserId,
        shipping_address: Address,
        billing_address: Address,
        payment_method: PaymentMethod,
    ) -> Result<Order, CheckoutError> {
        // Claim the cart: concurrent conversions for the same user see it
        // empty from here on.
        let lines = self.carts.take(user_id).await;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let requests: Vec<_> = lines
            .iter()
            .map(|line| (line.product_id.clone(), line.quantity))
            .collect();

        // Atomic across all lines: either every decrement lands or none do.
        let snapshots = match self.ledger.reserve(&requests).await {
            Ok(snapshots) => snapshots,
            Err(err) => {
                self.carts.restore(user_id, lines).await;
                return Err(err.into());
            }
        };

        let items: Vec<OrderItem> = lines
            .iter()
            .zip(&snapshots)
            .map(|(line, product)| OrderItem {
                sku: line.product_id.clone(),
                name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.unit_price,
            })
            .collect();

        let subtotal = items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.line_total());
        let pricing = PriceBreakdown::from_subtotal(subtotal);

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            user_id,
            items,
            pricing,
            status: OrderStatus::Placed,
            shipping_address,
            billing_address,
            payment_method,
            created_at: now,
            updated_at: now,
        };

        // Stock is already committed and the cart already claimed, so
        // nothing below can fail.
        self.orders.insert(order.clone()).await;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(
            order_id = %order.id,
            total = %order.pricing.total,
            items = order.items.len(),
            "Order placed"
        );

        Ok(order)
    }
}
