//! Immutable orders and the order store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Actor, Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::OrderError;
use crate::pricing::PriceBreakdown;

/// The status of a placed order.
///
/// Status transitions:
/// ```text
/// Placed ──► Shipped ──► Delivered
///    │
///    └─────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order was placed and stock reserved.
    #[default]
    Placed,

    /// Order has left the warehouse.
    Shipped,

    /// Order reached the customer (terminal state).
    Delivered,

    /// Order was cancelled before shipping (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order can be shipped in this status.
    pub fn can_ship(&self) -> bool {
        matches!(self, OrderStatus::Placed)
    }

    /// Returns true if the order can be delivered in this status.
    pub fn can_deliver(&self) -> bool {
        matches!(self, OrderStatus::Shipped)
    }

    /// Returns true if the order can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Placed)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One item of an order, frozen at purchase time.
///
/// Later product edits (price, name, deactivation) never touch this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderItem {
    /// Returns the item total (quantity x unit price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A postal address captured on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    Card,
    Upi,
}

/// A placed order. Items and pricing never change; only `status` (and the
/// `updated_at` it drags along) is mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub pricing: PriceBreakdown,
    pub status: OrderStatus,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory order store.
#[derive(Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl OrderStore {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a newly created order. Called by checkout only.
    pub(crate) async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    /// Returns an order if the actor owns it or is an admin.
    pub async fn get(&self, actor: Actor, order_id: OrderId) -> Result<Order, OrderError> {
        let orders = self.orders.read().await;
        let order = orders
            .get(&order_id)
            .ok_or(OrderError::NotFound(order_id))?;
        if !actor.owns_or_admin(order.user_id) {
            return Err(OrderError::Unauthorized(order_id));
        }
        Ok(order.clone())
    }

    /// Returns all orders for a user, newest first.
    pub async fn for_user(&self, user_id: UserId) -> Vec<Order> {
        let orders = self.orders.read().await;
        let mut result: Vec<_> = orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    /// Marks an order shipped. Admin only.
    #[tracing::instrument(skip(self))]
    pub async fn mark_shipped(&self, actor: Actor, order_id: OrderId) -> Result<Order, OrderError> {
        self.transition(actor, order_id, "ship", OrderStatus::Shipped, |s| {
            s.can_ship()
        })
        .await
    }

    /// Marks an order delivered. Admin only.
    #[tracing::instrument(skip(self))]
    pub async fn mark_delivered(
        &self,
        actor: Actor,
        order_id: OrderId,
    ) -> Result<Order, OrderError> {
        self.transition(actor, order_id, "deliver", OrderStatus::Delivered, |s| {
            s.can_deliver()
        })
        .await
    }

    /// Cancels an order that has not shipped. Owner or admin.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, actor: Actor, order_id: OrderId) -> Result<Order, OrderError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderError::NotFound(order_id))?;
        if !actor.owns_or_admin(order.user_id) {
            return Err(OrderError::Unauthorized(order_id));
        }
        if !order.status.can_cancel() {
            return Err(OrderError::InvalidStatusChange {
                current: order.status,
                action: "cancel",
            });
        }
        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn transition(
        &self,
        actor: Actor,
        order_id: OrderId,
        action: &'static str,
        next: OrderStatus,
        allowed: impl Fn(OrderStatus) -> bool,
    ) -> Result<Order, OrderError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderError::NotFound(order_id))?;
        if !actor.is_admin() {
            return Err(OrderError::Unauthorized(order_id));
        }
        if !allowed(order.status) {
            return Err(OrderError::InvalidStatusChange {
                current: order.status,
                action,
            });
        }
        order.status = next;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address() -> Address {
        Address {
            line1: "12 Lake View Road".to_string(),
            line2: None,
            city: "Pune".to_string(),
            postal_code: "411001".to_string(),
        }
    }

    fn test_order(user_id: UserId) -> Order {
        let items = vec![OrderItem {
            sku: ProductId::new("SKU-TREATS-01"),
            name: "Chicken Treats".to_string(),
            quantity: 2,
            unit_price: Money::from_rupees(100),
        }];
        let subtotal = Money::from_rupees(200);
        Order {
            id: OrderId::new(),
            user_id,
            items,
            pricing: PriceBreakdown::from_subtotal(subtotal),
            status: OrderStatus::Placed,
            shipping_address: test_address(),
            billing_address: test_address(),
            payment_method: PaymentMethod::CashOnDelivery,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn owner_can_read_own_order() {
        let store = OrderStore::new();
        let user = UserId::new();
        let order = test_order(user);
        let order_id = order.id;
        store.insert(order).await;

        let loaded = store.get(Actor::customer(user), order_id).await.unwrap();
        assert_eq!(loaded.id, order_id);
    }

    #[tokio::test]
    async fn stranger_cannot_read_order() {
        let store = OrderStore::new();
        let order = test_order(UserId::new());
        let order_id = order.id;
        store.insert(order).await;

        let result = store.get(Actor::customer(UserId::new()), order_id).await;
        assert!(matches!(result, Err(OrderError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn full_order_lifecycle() {
        let store = OrderStore::new();
        let admin = Actor::admin(UserId::new());
        let order = test_order(UserId::new());
        let order_id = order.id;
        store.insert(order).await;

        let shipped = store.mark_shipped(admin, order_id).await.unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);

        let delivered = store.mark_delivered(admin, order_id).await.unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert!(delivered.status.is_terminal());
    }

    #[tokio::test]
    async fn cannot_deliver_unshipped_order() {
        let store = OrderStore::new();
        let admin = Actor::admin(UserId::new());
        let order = test_order(UserId::new());
        let order_id = order.id;
        store.insert(order).await;

        let result = store.mark_delivered(admin, order_id).await;
        assert!(matches!(
            result,
            Err(OrderError::InvalidStatusChange { .. })
        ));
    }

    #[tokio::test]
    async fn owner_can_cancel_placed_order() {
        let store = OrderStore::new();
        let user = UserId::new();
        let order = test_order(user);
        let order_id = order.id;
        store.insert(order).await;

        let cancelled = store.cancel(Actor::customer(user), order_id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn cannot_cancel_shipped_order() {
        let store = OrderStore::new();
        let user = UserId::new();
        let admin = Actor::admin(UserId::new());
        let order = test_order(user);
        let order_id = order.id;
        store.insert(order).await;
        store.mark_shipped(admin, order_id).await.unwrap();

        let result = store.cancel(Actor::customer(user), order_id).await;
        assert!(matches!(
            result,
            Err(OrderError::InvalidStatusChange { .. })
        ));
    }

    #[tokio::test]
    async fn for_user_returns_newest_first() {
        let store = OrderStore::new();
        let user = UserId::new();

        let mut first = test_order(user);
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        let second = test_order(user);
        store.insert(first).await;
        store.insert(second.clone()).await;
        store.insert(test_order(UserId::new())).await;

        let orders = store.for_user(user).await;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.id);
    }
}
